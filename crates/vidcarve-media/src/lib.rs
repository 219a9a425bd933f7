//! Vidcarve-Media: MP4 boundary detection inside opaque byte buffers
//!
//! This crate finds MP4 files embedded in arbitrary data (game asset
//! archives, resource blobs) and reports the byte range each one occupies.
//! Nothing is copied: every result borrows from the buffer it was found in.
//!
//! # Modules
//!
//! - `mp4` - Flat atom walk and structured payload extraction
//! - `scan` - Forward scan for the `ftyp` signature
//!
//! # Strategy
//!
//! A payload is located in two steps:
//!
//! 1. The scanner finds an `ftyp` tag and assumes the four bytes before it
//!    are the size field of the first atom.
//! 2. The boundary parser walks sibling atoms from there. When a `moov` atom
//!    is present the payload ends where the last atom ends; otherwise a
//!    bounded window is taken if it mentions `moov` or `mdat` at all.

pub mod mp4;
pub mod scan;

pub use mp4::{
    extract_payload, extract_structured_payload, read_atoms, Atom, AtomType, ExtractLimits,
    Payload, PayloadKind,
};
pub use scan::{find_signature, scan_for_payloads, SignatureScanner, SIGNATURE};
