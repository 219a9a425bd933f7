use super::{ExtractError, Extractor};
use crate::output::PayloadDir;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use vidcarve_assets::{AssetArchive, AssetStore, ObjectHandle};
use vidcarve_media::{extract_payload, find_signature, ExtractLimits, SIGNATURE};

/// Pick the video bytes out of an object's blob.
///
/// A blob that starts with the signature is taken whole. Otherwise the first
/// signature occurrence with room for a size field in front of it is handed
/// to the boundary parser. Anything else is an opaque binary.
pub fn select_video<'a>(blob: &'a [u8], limits: &ExtractLimits) -> Option<&'a [u8]> {
    if blob.starts_with(SIGNATURE) {
        return Some(blob);
    }

    match find_signature(blob, 0) {
        Some(found) if found >= 4 => extract_payload(blob, found - 4, limits).map(|p| p.data),
        _ => None,
    }
}

impl Extractor {
    pub(super) fn extract_from_assets(
        &self,
        store: &dyn AssetStore,
        path: &Path,
        stem: &str,
        written: &mut Vec<PathBuf>,
    ) -> Result<(), ExtractError> {
        let archive = store.load(path)?;
        info!(
            "{} found {} objects in {:?}",
            store.name(),
            archive.objects.len(),
            path
        );

        let mut dir = self.output.asset_dir(stem);
        for handle in archive.video_objects() {
            match self.extract_object(&archive, handle, &mut dir) {
                Ok(Some(path)) => written.push(path),
                Ok(None) => {}
                Err(e @ ExtractError::Write { .. }) => {
                    warn!("Skipping {} #{}: {}", handle.class, handle.index, e)
                }
                Err(e) => debug!("Skipping {} #{}: {}", handle.class, handle.index, e),
            }
        }

        Ok(())
    }

    fn extract_object(
        &self,
        archive: &AssetArchive,
        handle: &ObjectHandle,
        dir: &mut PayloadDir,
    ) -> Result<Option<PathBuf>, ExtractError> {
        let object = handle.read()?;

        let Some(blob) = object.probe_blob(&self.data_fields[..], archive.base_dir()) else {
            debug!("{} #{} has no data field", handle.class, handle.index);
            return Ok(None);
        };

        if blob.len() < self.limits.min_payload_size {
            debug!(
                "{} #{} blob too small ({} bytes)",
                handle.class,
                handle.index,
                blob.len()
            );
            return Ok(None);
        }

        let Some(video) = select_video(&blob, &self.limits) else {
            debug!("{} #{} is not an MP4 payload", handle.class, handle.index);
            return Ok(None);
        };

        let name = format!("unitypy_{}_{}.mp4", handle.class, handle.index);
        let path = dir.write(&name, video).map_err(|source| ExtractError::Write {
            path: dir.path().join(&name),
            source,
        })?;

        info!("Extracted {} ({} bytes)", name, video.len());
        Ok(Some(path))
    }
}
