//! Output layout.
//!
//! Every input file gets its own subdirectory under the output root, named
//! after the input's file stem and the strategy that produced the videos.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Suffix of the directory holding videos read through an asset store.
pub const ASSET_DIR_SUFFIX: &str = "_unitypy_videos";

/// Suffix of the directory holding videos found by signature scan.
pub const SCAN_DIR_SUFFIX: &str = "_videos";

/// Root directory receiving all extracted payloads.
#[derive(Debug, Clone)]
pub struct OutputRoot {
    root: PathBuf,
}

impl OutputRoot {
    /// Create the root directory if needed.
    pub fn create(root: impl Into<PathBuf>) -> io::Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Root directory path.
    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Directory for videos read through the asset store.
    pub fn asset_dir(&self, stem: &str) -> PayloadDir {
        PayloadDir::new(self.root.join(format!("{}{}", stem, ASSET_DIR_SUFFIX)))
    }

    /// Directory for videos found by signature scan.
    pub fn scan_dir(&self, stem: &str) -> PayloadDir {
        PayloadDir::new(self.root.join(format!("{}{}", stem, SCAN_DIR_SUFFIX)))
    }
}

/// A per-file output directory, created on first use.
#[derive(Debug)]
pub struct PayloadDir {
    path: PathBuf,
    created: bool,
}

impl PayloadDir {
    fn new(path: PathBuf) -> Self {
        Self {
            path,
            created: false,
        }
    }

    /// Directory path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the directory if it does not exist yet.
    pub fn ensure(&mut self) -> io::Result<()> {
        if !self.created {
            fs::create_dir_all(&self.path)?;
            self.created = true;
        }
        Ok(())
    }

    /// Write `data` to `name` inside the directory, creating it if needed.
    ///
    /// Existing files are overwritten.
    pub fn write(&mut self, name: &str, data: &[u8]) -> io::Result<PathBuf> {
        self.ensure()?;
        let path = self.path.join(name);
        fs::write(&path, data)?;
        Ok(path)
    }
}

/// File stem used to name an input's output directories.
pub fn output_stem(input: &Path) -> String {
    input
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "unnamed".to_string())
}
