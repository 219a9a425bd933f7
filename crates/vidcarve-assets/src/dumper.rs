//! Asset store backed by an external dumper executable.
//!
//! The dumper is invoked as `<program> [args..] <archive>` and must print a
//! JSON document describing the archive's objects on stdout:
//!
//! ```json
//! {"objects": [
//!   {"type": "VideoClip", "fields": {"m_VideoData": {"bytes": "<base64>"}}},
//!   {"type": "MovieTexture", "fields": {"m_MovieData": {"resource": {"path": "a.resource", "offset": 0, "size": 4096}}}},
//!   {"type": "Texture2D"},
//!   {"type": "VideoClip", "error": "could not deserialize"}
//! ]}
//! ```

use crate::{
    AssetArchive, AssetClass, AssetError, AssetObject, AssetStore, FieldValue, ObjectHandle,
    ResourceRef, Result,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct DumpOutput {
    #[serde(default)]
    objects: Vec<DumpObject>,
}

#[derive(Debug, Deserialize)]
struct DumpObject {
    #[serde(rename = "type")]
    class: String,
    #[serde(default)]
    fields: BTreeMap<String, DumpField>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DumpField {
    Bytes { bytes: String },
    Resource { resource: DumpResource },
    #[allow(dead_code)]
    Other(serde_json::Value),
}

#[derive(Debug, Deserialize)]
struct DumpResource {
    path: PathBuf,
    #[serde(default)]
    offset: u64,
    size: u64,
}

/// Asset store that shells out to an external dumper.
#[derive(Debug, Clone)]
pub struct DumperStore {
    name: String,
    program: PathBuf,
    args: Vec<String>,
}

impl DumperStore {
    /// Locate `program` and prepare a store that runs it.
    ///
    /// An existing path is used as is; otherwise the name is looked up on
    /// `PATH`.
    pub fn new(program: impl AsRef<Path>, args: Vec<String>) -> Result<Self> {
        let program = program.as_ref();
        let name = program
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| program.display().to_string());

        let resolved = if program.exists() {
            program.to_path_buf()
        } else {
            which::which(program).map_err(|_| AssetError::tool_not_found(&name))?
        };

        Ok(Self {
            name,
            program: resolved,
            args,
        })
    }

    /// Resolved executable path.
    pub fn program(&self) -> &Path {
        &self.program
    }
}

impl AssetStore for DumperStore {
    fn name(&self) -> &str {
        &self.name
    }

    fn load(&self, path: &Path) -> Result<AssetArchive> {
        debug!("Running {} on {:?}", self.name, path);

        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(path)
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    AssetError::tool_not_found(&self.name)
                } else {
                    AssetError::Io(e)
                }
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AssetError::tool_failed(&self.name, stderr.trim().to_string()));
        }

        let dump: DumpOutput = serde_json::from_slice(&output.stdout)
            .map_err(|e| AssetError::parse_error(&self.name, e.to_string()))?;

        Ok(parse_dump_output(path, dump))
    }
}

fn parse_dump_output(path: &Path, dump: DumpOutput) -> AssetArchive {
    let objects = dump
        .objects
        .into_iter()
        .enumerate()
        .map(|(index, object)| {
            let class = AssetClass::from_name(&object.class);
            if let Some(message) = object.error {
                return ObjectHandle::unreadable(index, class, message);
            }
            match convert_fields(object.fields) {
                Ok(fields) => ObjectHandle::new(index, class, AssetObject { fields }),
                Err(message) => ObjectHandle::unreadable(index, class, message),
            }
        })
        .collect();

    AssetArchive {
        path: path.to_path_buf(),
        objects,
    }
}

fn convert_fields(
    fields: BTreeMap<String, DumpField>,
) -> std::result::Result<Vec<(String, FieldValue)>, String> {
    fields
        .into_iter()
        .map(|(name, field)| {
            let value = match field {
                DumpField::Bytes { bytes } => FieldValue::Bytes(
                    STANDARD
                        .decode(bytes.as_bytes())
                        .map_err(|e| format!("field {}: invalid base64: {}", name, e))?,
                ),
                DumpField::Resource { resource } => FieldValue::Resource(ResourceRef {
                    path: resource.path,
                    offset: resource.offset,
                    size: resource.size,
                }),
                DumpField::Other(_) => FieldValue::Other,
            };
            Ok((name, value))
        })
        .collect()
}
