//! MP4 container boundary detection.
//!
//! This module walks top-level atoms in a byte buffer to decide where an
//! embedded MP4 file starts and ends.

mod atoms;
mod boundary;

pub use atoms::{Atom, AtomType, ATOM_HEADER_SIZE};
pub use boundary::{extract_payload, extract_structured_payload, read_atoms};

/// Default minimum payload size in bytes.
pub const DEFAULT_MIN_PAYLOAD_SIZE: usize = 1000;

/// Default cap on the fallback window (100 MiB).
pub const DEFAULT_MAX_WINDOW: usize = 100 * 1024 * 1024;

/// Size thresholds applied while extracting payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractLimits {
    /// Smallest payload the scanner accepts, and the number of bytes that
    /// must remain after a start offset before the fallback window is tried.
    pub min_payload_size: usize,
    /// Largest fallback window taken when no `moov` atom is found.
    pub max_window: usize,
}

impl Default for ExtractLimits {
    fn default() -> Self {
        Self {
            min_payload_size: DEFAULT_MIN_PAYLOAD_SIZE,
            max_window: DEFAULT_MAX_WINDOW,
        }
    }
}

/// How a payload's end offset was decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadKind {
    /// End of the last atom in a sequence that contains `moov`.
    Structured,
    /// Fixed-size window that merely mentions `moov` or `mdat`.
    Windowed,
}

impl std::fmt::Display for PayloadKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Structured => write!(f, "structured"),
            Self::Windowed => write!(f, "windowed"),
        }
    }
}

/// A candidate MP4 file borrowed from its source buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Payload<'a> {
    /// Offset of the first byte in the source buffer.
    pub start: usize,
    /// Offset one past the last byte in the source buffer.
    pub end: usize,
    /// Strategy that produced the boundaries.
    pub kind: PayloadKind,
    /// The bytes `source[start..end]`.
    pub data: &'a [u8],
}

impl<'a> Payload<'a> {
    /// Payload length in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the payload holds no bytes.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
