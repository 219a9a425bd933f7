//! The asset store seam.

use crate::{AssetArchive, Result};
use std::path::Path;

/// Reader that turns an archive file into enumerable objects.
pub trait AssetStore {
    /// Short name used in log messages.
    fn name(&self) -> &str;

    /// Load every object of the archive at `path`.
    fn load(&self, path: &Path) -> Result<AssetArchive>;
}

