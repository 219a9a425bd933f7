use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use vidcarve_assets::DEFAULT_DATA_FIELDS;
use vidcarve_media::mp4::{DEFAULT_MAX_WINDOW, DEFAULT_MIN_PAYLOAD_SIZE};
use vidcarve_media::ExtractLimits;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub extract: ExtractConfig,

    #[serde(default)]
    pub assets: AssetsConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExtractConfig {
    /// Smallest payload written, in bytes
    #[serde(default = "default_min_payload_size")]
    pub min_payload_size: usize,

    /// Largest fallback window taken when no moov atom is found, in bytes
    #[serde(default = "default_max_window")]
    pub max_window: usize,
}

fn default_min_payload_size() -> usize {
    DEFAULT_MIN_PAYLOAD_SIZE
}

fn default_max_window() -> usize {
    DEFAULT_MAX_WINDOW
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            min_payload_size: default_min_payload_size(),
            max_window: default_max_window(),
        }
    }
}

impl ExtractConfig {
    pub fn limits(&self) -> ExtractLimits {
        ExtractLimits {
            min_payload_size: self.min_payload_size,
            max_window: self.max_window,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AssetsConfig {
    /// External dumper executable; without one only the signature scan runs
    #[serde(default)]
    pub dumper: Option<PathBuf>,

    /// Extra arguments passed before the archive path
    #[serde(default)]
    pub args: Vec<String>,

    /// Object fields probed for video bytes, first match wins
    #[serde(default = "default_data_fields")]
    pub data_fields: Vec<String>,
}

fn default_data_fields() -> Vec<String> {
    DEFAULT_DATA_FIELDS.iter().map(|s| s.to_string()).collect()
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            dumper: None,
            args: Vec::new(),
            data_fields: default_data_fields(),
        }
    }
}
