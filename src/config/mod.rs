mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    let default_paths = ["./vidcarve.toml", "~/.config/vidcarve/config.toml"];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            tracing::debug!("Using config file {:?}", path);
            return load_config(path);
        }
    }

    Ok(Config::default())
}

/// Validate configuration
fn validate_config(config: &Config) -> Result<()> {
    if config.extract.min_payload_size < 8 {
        anyhow::bail!(
            "min_payload_size must be at least 8 bytes, got {}",
            config.extract.min_payload_size
        );
    }

    if config.extract.max_window < config.extract.min_payload_size {
        anyhow::bail!(
            "max_window ({}) cannot be smaller than min_payload_size ({})",
            config.extract.max_window,
            config.extract.min_payload_size
        );
    }

    if config.assets.data_fields.is_empty() {
        anyhow::bail!("assets.data_fields cannot be empty");
    }

    if let Some(dumper) = &config.assets.dumper {
        if dumper.as_os_str().is_empty() {
            anyhow::bail!("assets.dumper cannot be an empty path");
        }
    }

    Ok(())
}
