//! Per-file extraction policy.
//!
//! Each input file goes through at most two strategies, in order:
//!
//! 1. **Assets** - the archive is loaded through an [`AssetStore`] and the
//!    byte blobs of video objects are written out.
//! 2. **Signature** - when the first strategy wrote nothing, the raw file is
//!    scanned for the `ftyp` signature.
//!
//! Failures never leave the file they happened in: they are logged and
//! recorded in the file's [`FileReport`].

mod assets;
mod signature;

pub use assets::select_video;

use crate::output::{output_stem, OutputRoot};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use vidcarve_assets::{AssetError, AssetStore, DEFAULT_DATA_FIELDS};
use vidcarve_media::ExtractLimits;

/// Errors raised while extracting from one input file.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// The input file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A payload or its directory could not be written.
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The asset store failed.
    #[error(transparent)]
    Asset(#[from] AssetError),
}

/// Strategy that handled a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Assets,
    Signature,
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Assets => write!(f, "assets"),
            Self::Signature => write!(f, "signature"),
        }
    }
}

/// Outcome of processing one input file.
#[derive(Debug)]
pub struct FileReport {
    /// Input file.
    pub path: PathBuf,
    /// Strategy that ran last.
    pub strategy: Strategy,
    /// Payload files written, in order.
    pub written: Vec<PathBuf>,
    /// Failure that cut the last strategy short.
    pub error: Option<String>,
}

impl FileReport {
    fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            strategy: Strategy::Assets,
            written: Vec::new(),
            error: None,
        }
    }

    /// Number of payloads written.
    pub fn extracted(&self) -> usize {
        self.written.len()
    }
}

/// Outcome of a whole run.
#[derive(Debug, Default)]
pub struct BatchSummary {
    pub reports: Vec<FileReport>,
}

impl BatchSummary {
    /// Total number of payloads written.
    pub fn total_extracted(&self) -> usize {
        self.reports.iter().map(FileReport::extracted).sum()
    }

    /// Reports that ended with an error.
    pub fn failed(&self) -> impl Iterator<Item = &FileReport> {
        self.reports.iter().filter(|r| r.error.is_some())
    }
}

/// Runs the extraction policy over input files.
pub struct Extractor {
    output: OutputRoot,
    store: Option<Box<dyn AssetStore>>,
    limits: ExtractLimits,
    data_fields: Vec<String>,
}

impl Extractor {
    /// Create an extractor that only runs the signature scan.
    pub fn new(output: OutputRoot, limits: ExtractLimits) -> Self {
        Self {
            output,
            store: None,
            limits,
            data_fields: DEFAULT_DATA_FIELDS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Try `store` before falling back to the signature scan.
    pub fn with_store(mut self, store: Box<dyn AssetStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Override the object fields probed for video bytes.
    pub fn with_data_fields(mut self, data_fields: Vec<String>) -> Self {
        self.data_fields = data_fields;
        self
    }

    /// Process every file in order.
    pub fn run(&self, files: &[PathBuf]) -> BatchSummary {
        let mut summary = BatchSummary::default();

        for (i, path) in files.iter().enumerate() {
            let size = std::fs::metadata(path).map(|m| m.len()).unwrap_or(0);
            info!(
                "Processing file {}/{}: {} ({} bytes)",
                i + 1,
                files.len(),
                display_name(path),
                size
            );

            let report = self.process_file(path);
            info!("Extracted {} videos from {}", report.extracted(), display_name(path));
            summary.reports.push(report);
        }

        summary
    }

    /// Run the extraction policy on one file.
    pub fn process_file(&self, path: &Path) -> FileReport {
        let stem = output_stem(path);
        let mut report = FileReport::new(path);

        match &self.store {
            Some(store) => {
                if let Err(e) = self.extract_from_assets(store.as_ref(), path, &stem, &mut report.written)
                {
                    warn!("{} could not extract from {:?}: {}", store.name(), path, e);
                }
            }
            None => debug!("No asset store configured for {:?}", path),
        }

        if report.written.is_empty() {
            debug!("Falling back to signature scan for {:?}", path);
            report.strategy = Strategy::Signature;
            if let Err(e) = self.extract_by_signature(path, &stem, &mut report.written) {
                warn!("Signature scan failed for {:?}: {}", path, e);
                report.error = Some(e.to_string());
            }
        }

        report
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::fs;
    use tempfile::tempdir;
    use vidcarve_assets::{AssetArchive, AssetClass, AssetObject, FieldValue, ObjectHandle};

    fn atom(atom_type: &[u8; 4], payload_len: usize) -> Vec<u8> {
        let size = (8 + payload_len) as u32;
        let mut out = size.to_be_bytes().to_vec();
        out.extend_from_slice(atom_type);
        out.resize(8 + payload_len, 0);
        out
    }

    fn mp4(mdat_len: usize) -> Vec<u8> {
        let mut out = atom(b"ftyp", 12);
        out.extend_from_slice(&atom(b"moov", 100));
        out.extend_from_slice(&atom(b"mdat", mdat_len));
        out
    }

    /// Store returning canned archives keyed by file name.
    struct FakeStore {
        archives: HashMap<String, Vec<ObjectHandle>>,
    }

    impl AssetStore for FakeStore {
        fn name(&self) -> &str {
            "fake"
        }

        fn load(&self, path: &Path) -> vidcarve_assets::Result<AssetArchive> {
            let name = display_name(path);
            let objects = self
                .archives
                .get(&name)
                .cloned()
                .ok_or_else(|| AssetError::tool_failed("fake", "not an asset archive"))?;
            Ok(AssetArchive {
                path: path.to_path_buf(),
                objects,
            })
        }
    }

    fn blob_object(index: usize, class: AssetClass, field: &str, bytes: Vec<u8>) -> ObjectHandle {
        ObjectHandle::new(
            index,
            class,
            AssetObject {
                fields: vec![(field.to_string(), FieldValue::Bytes(bytes))],
            },
        )
    }

    #[test]
    fn test_signature_only_without_store() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("level0.assets");
        let video = mp4(3000);
        let mut content = vec![0xEE; 512];
        content.extend_from_slice(&video);
        fs::write(&input, &content).unwrap();

        let output = OutputRoot::create(dir.path().join("out")).unwrap();
        let extractor = Extractor::new(output, ExtractLimits::default());
        let report = extractor.process_file(&input);

        assert_eq!(report.strategy, Strategy::Signature);
        assert!(report.error.is_none());
        assert_eq!(
            report.written,
            vec![dir.path().join("out/level0_videos/video_0.mp4")]
        );
        assert_eq!(fs::read(&report.written[0]).unwrap(), video);
        assert!(!dir.path().join("out/level0_unitypy_videos").exists());
    }

    #[test]
    fn test_assets_take_precedence() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("sharedassets1.assets");
        // The raw file also holds a video; it must not be scanned.
        fs::write(&input, mp4(2000)).unwrap();

        let wrapped = {
            let mut blob = vec![0u8; 40];
            blob.extend_from_slice(&mp4(1500));
            blob
        };
        let mut literal = b"ftyp".to_vec();
        literal.extend_from_slice(&[7u8; 1200]);

        let store = FakeStore {
            archives: HashMap::from([(
                "sharedassets1.assets".to_string(),
                vec![
                    blob_object(0, AssetClass::from_name("Texture2D"), "m_Data", mp4(5000)),
                    blob_object(1, AssetClass::VideoClip, "m_VideoData", wrapped),
                    ObjectHandle::unreadable(2, AssetClass::VideoClip, "broken"),
                    blob_object(3, AssetClass::MovieTexture, "m_MovieData", literal.clone()),
                    blob_object(4, AssetClass::VideoClip, "m_VideoData", vec![1u8; 4000]),
                    blob_object(5, AssetClass::VideoClip, "m_VideoData", mp4(10)),
                ],
            )]),
        };

        let output = OutputRoot::create(dir.path().join("out")).unwrap();
        let extractor = Extractor::new(output, ExtractLimits::default()).with_store(Box::new(store));
        let report = extractor.process_file(&input);

        let out = dir.path().join("out/sharedassets1_unitypy_videos");
        assert_eq!(report.strategy, Strategy::Assets);
        assert_eq!(
            report.written,
            vec![
                out.join("unitypy_VideoClip_1.mp4"),
                out.join("unitypy_MovieTexture_3.mp4"),
            ]
        );
        assert_eq!(fs::read(out.join("unitypy_VideoClip_1.mp4")).unwrap(), mp4(1500));
        assert_eq!(fs::read(out.join("unitypy_MovieTexture_3.mp4")).unwrap(), literal);
        assert!(!dir.path().join("out/sharedassets1_videos").exists());
    }

    #[test]
    fn test_store_failure_falls_back() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("resources.resource");
        fs::write(&input, mp4(1200)).unwrap();

        let store = FakeStore {
            archives: HashMap::new(),
        };
        let output = OutputRoot::create(dir.path().join("out")).unwrap();
        let extractor = Extractor::new(output, ExtractLimits::default()).with_store(Box::new(store));
        let report = extractor.process_file(&input);

        assert_eq!(report.strategy, Strategy::Signature);
        assert_eq!(report.extracted(), 1);
    }

    #[test]
    fn test_empty_asset_result_falls_back() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("level2");
        fs::write(&input, vec![0u8; 2048]).unwrap();

        let store = FakeStore {
            archives: HashMap::from([(
                "level2".to_string(),
                vec![blob_object(0, AssetClass::VideoClip, "m_VideoData", vec![0u8; 10])],
            )]),
        };
        let output = OutputRoot::create(dir.path().join("out")).unwrap();
        let extractor = Extractor::new(output, ExtractLimits::default()).with_store(Box::new(store));
        let report = extractor.process_file(&input);

        assert_eq!(report.strategy, Strategy::Signature);
        assert_eq!(report.extracted(), 0);
        assert!(report.error.is_none());

        let scan_dir = dir.path().join("out/level2_videos");
        assert!(scan_dir.is_dir());
        assert_eq!(fs::read_dir(scan_dir).unwrap().count(), 0);
    }

    #[test]
    fn test_unreadable_input_is_reported() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("missing.assets");

        let output = OutputRoot::create(dir.path().join("out")).unwrap();
        let extractor = Extractor::new(output, ExtractLimits::default());
        let summary = extractor.run(&[input]);

        assert_eq!(summary.reports.len(), 1);
        assert_eq!(summary.total_extracted(), 0);
        assert_eq!(summary.failed().count(), 1);
        assert!(summary.reports[0]
            .error
            .as_deref()
            .unwrap()
            .contains("failed to read"));
    }

    #[test]
    fn test_custom_data_fields() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("bundle");
        fs::write(&input, b"opaque").unwrap();

        let store = FakeStore {
            archives: HashMap::from([(
                "bundle".to_string(),
                vec![blob_object(0, AssetClass::VideoClip, "m_Payload", mp4(2000))],
            )]),
        };
        let output = OutputRoot::create(dir.path().join("out")).unwrap();

        let default_fields =
            Extractor::new(output.clone(), ExtractLimits::default()).with_store(Box::new(store));
        assert_eq!(default_fields.process_file(&input).strategy, Strategy::Signature);

        let store = FakeStore {
            archives: HashMap::from([(
                "bundle".to_string(),
                vec![blob_object(0, AssetClass::VideoClip, "m_Payload", mp4(2000))],
            )]),
        };
        let custom = Extractor::new(output, ExtractLimits::default())
            .with_store(Box::new(store))
            .with_data_fields(vec!["m_Payload".to_string()]);
        let report = custom.process_file(&input);
        assert_eq!(report.strategy, Strategy::Assets);
        assert_eq!(report.extracted(), 1);
    }
}
