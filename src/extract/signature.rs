use super::{ExtractError, Extractor};
use std::path::{Path, PathBuf};
use tracing::info;
use vidcarve_media::SignatureScanner;

impl Extractor {
    /// Scan the raw file and write every accepted payload as it is found.
    ///
    /// The output directory is created before the file is read, so it exists
    /// even when nothing is found.
    pub(super) fn extract_by_signature(
        &self,
        path: &Path,
        stem: &str,
        written: &mut Vec<PathBuf>,
    ) -> Result<(), ExtractError> {
        let mut dir = self.output.scan_dir(stem);
        dir.ensure().map_err(|source| ExtractError::Write {
            path: dir.path().to_path_buf(),
            source,
        })?;

        let content = std::fs::read(path).map_err(|source| ExtractError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        for (index, payload) in SignatureScanner::with_limits(&content, self.limits).enumerate() {
            let name = format!("video_{}.mp4", index);
            let written_path = dir
                .write(&name, payload.data)
                .map_err(|source| ExtractError::Write {
                    path: dir.path().join(&name),
                    source,
                })?;

            info!(
                "Extracted {} ({} bytes, {} at offset {})",
                name,
                payload.len(),
                payload.kind,
                payload.start
            );
            written.push(written_path);
        }

        Ok(())
    }
}
