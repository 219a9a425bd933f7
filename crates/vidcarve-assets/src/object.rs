//! Asset archive contents as seen by the extractor.

use crate::{AssetError, Result};
use std::borrow::Cow;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Field names that commonly hold encoded video, in probing order.
pub const DEFAULT_DATA_FIELDS: &[&str] = &["m_VideoData", "m_MovieData", "data", "bytes", "m_Data"];

/// Class of a deserialized asset object.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AssetClass {
    VideoClip,
    MovieTexture,
    Other(String),
}

impl AssetClass {
    /// Map a class name reported by the archive reader.
    pub fn from_name(name: &str) -> Self {
        match name {
            "VideoClip" => Self::VideoClip,
            "MovieTexture" => Self::MovieTexture,
            other => Self::Other(other.to_string()),
        }
    }

    /// Class name as reported by the archive reader.
    pub fn name(&self) -> &str {
        match self {
            Self::VideoClip => "VideoClip",
            Self::MovieTexture => "MovieTexture",
            Self::Other(name) => name,
        }
    }

    /// Whether objects of this class carry video data.
    pub fn is_video(&self) -> bool {
        matches!(self, Self::VideoClip | Self::MovieTexture)
    }
}

impl std::fmt::Display for AssetClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Byte range inside an external resource file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRef {
    /// Resource file, relative paths resolve against the archive directory.
    pub path: PathBuf,
    /// Offset of the first byte.
    pub offset: u64,
    /// Number of bytes.
    pub size: u64,
}

impl ResourceRef {
    /// Resolve the resource path against `base_dir`.
    pub fn resolve(&self, base_dir: Option<&Path>) -> PathBuf {
        match base_dir {
            Some(dir) if self.path.is_relative() => dir.join(&self.path),
            _ => self.path.clone(),
        }
    }

    /// Read the referenced bytes.
    pub fn read(&self, base_dir: Option<&Path>) -> Result<Vec<u8>> {
        let path = self.resolve(base_dir);
        let wrap = |source| AssetError::Resource {
            path: path.clone(),
            source,
        };

        let mut file = File::open(&path).map_err(wrap)?;
        file.seek(SeekFrom::Start(self.offset)).map_err(wrap)?;

        let mut data = Vec::new();
        file.take(self.size).read_to_end(&mut data).map_err(wrap)?;
        if (data.len() as u64) < self.size {
            return Err(wrap(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                format!("expected {} bytes, got {}", self.size, data.len()),
            )));
        }
        Ok(data)
    }
}

/// Shape of a single field on an asset object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// Inline bytes.
    Bytes(Vec<u8>),
    /// Bytes stored in a separate resource file.
    Resource(ResourceRef),
    /// Anything that is not a byte blob.
    Other,
}

/// Named fields of a deserialized object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetObject {
    pub fields: Vec<(String, FieldValue)>,
}

impl AssetObject {
    /// Look up a field by name.
    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }

    /// Return the first usable byte blob among `names`.
    ///
    /// Fields are tried in order. Inline bytes are returned as they are;
    /// resources are read from disk and a failed read moves on to the next
    /// name.
    pub fn probe_blob<S: AsRef<str>>(
        &self,
        names: &[S],
        base_dir: Option<&Path>,
    ) -> Option<Cow<'_, [u8]>> {
        for name in names {
            let name = name.as_ref();
            match self.field(name) {
                Some(FieldValue::Bytes(bytes)) => return Some(Cow::Borrowed(bytes)),
                Some(FieldValue::Resource(resource)) => match resource.read(base_dir) {
                    Ok(bytes) => return Some(Cow::Owned(bytes)),
                    Err(e) => debug!("Field {} not readable: {}", name, e),
                },
                Some(FieldValue::Other) | None => {}
            }
        }
        None
    }
}

/// An enumerated object whose contents may fail to deserialize.
#[derive(Debug, Clone)]
pub struct ObjectHandle {
    /// Position in the archive's object list.
    pub index: usize,
    /// Object class.
    pub class: AssetClass,
    contents: std::result::Result<AssetObject, String>,
}

impl ObjectHandle {
    /// Create a handle for a readable object.
    pub fn new(index: usize, class: AssetClass, object: AssetObject) -> Self {
        Self {
            index,
            class,
            contents: Ok(object),
        }
    }

    /// Create a handle for an object that failed to deserialize.
    pub fn unreadable(index: usize, class: AssetClass, message: impl Into<String>) -> Self {
        Self {
            index,
            class,
            contents: Err(message.into()),
        }
    }

    /// Read the object's fields.
    pub fn read(&self) -> Result<&AssetObject> {
        self.contents
            .as_ref()
            .map_err(|message| AssetError::object_read(self.index, message.clone()))
    }
}

/// All objects loaded from one archive file.
#[derive(Debug, Clone)]
pub struct AssetArchive {
    /// Archive file the objects came from.
    pub path: PathBuf,
    /// Objects in archive order.
    pub objects: Vec<ObjectHandle>,
}

impl AssetArchive {
    /// Directory used to resolve relative resource paths.
    pub fn base_dir(&self) -> Option<&Path> {
        self.path.parent()
    }

    /// Objects whose class carries video data.
    pub fn video_objects(&self) -> impl Iterator<Item = &ObjectHandle> {
        self.objects.iter().filter(|o| o.class.is_video())
    }
}
