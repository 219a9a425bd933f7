//! Signature scan for embedded MP4 files.
//!
//! The scanner looks for the `ftyp` tag, backs up over the size field in
//! front of it and hands the resulting offset to the boundary parser. It is
//! a lazy iterator so callers can persist each payload as soon as it is
//! found.

use crate::mp4::{extract_payload, ExtractLimits, Payload};
use tracing::trace;

/// Bytes that mark the first atom of an MP4 file.
pub const SIGNATURE: &[u8; 4] = b"ftyp";

/// Offset of the signature relative to the start of its atom.
const SIGNATURE_OFFSET: usize = 4;

/// Find the first signature occurrence at or after `from`.
pub fn find_signature(buffer: &[u8], from: usize) -> Option<usize> {
    if from >= buffer.len() {
        return None;
    }
    buffer[from..]
        .windows(SIGNATURE.len())
        .position(|w| w == SIGNATURE)
        .map(|pos| from + pos)
}

/// Scan `buffer` for embedded MP4 files using default limits.
pub fn scan_for_payloads(buffer: &[u8]) -> SignatureScanner<'_> {
    SignatureScanner::new(buffer)
}

/// Iterator over payloads discovered by signature search.
///
/// The cursor moves four bytes past each signature occurrence, not past the
/// end of the payload it produced, so nested or overlapping files can be
/// reported more than once.
#[derive(Debug, Clone)]
pub struct SignatureScanner<'a> {
    buffer: &'a [u8],
    cursor: usize,
    limits: ExtractLimits,
}

impl<'a> SignatureScanner<'a> {
    /// Create a scanner with default limits.
    pub fn new(buffer: &'a [u8]) -> Self {
        Self::with_limits(buffer, ExtractLimits::default())
    }

    /// Create a scanner with custom limits.
    pub fn with_limits(buffer: &'a [u8], limits: ExtractLimits) -> Self {
        Self {
            buffer,
            cursor: 0,
            limits,
        }
    }

    /// Current search position.
    pub fn cursor(&self) -> usize {
        self.cursor
    }
}

impl<'a> Iterator for SignatureScanner<'a> {
    type Item = Payload<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let found = find_signature(self.buffer, self.cursor)?;

            // No room for a size field in front of the signature.
            if found < SIGNATURE_OFFSET {
                self.cursor = found + 1;
                continue;
            }

            self.cursor = found + SIGNATURE_OFFSET;
            let start = found - SIGNATURE_OFFSET;

            match extract_payload(self.buffer, start, &self.limits) {
                Some(payload) if payload.len() >= self.limits.min_payload_size => {
                    trace!(
                        start = payload.start,
                        end = payload.end,
                        kind = %payload.kind,
                        "Signature candidate accepted"
                    );
                    return Some(payload);
                }
                Some(payload) => {
                    trace!(start, len = payload.len(), "Signature candidate too small");
                }
                None => {
                    trace!(start, "Signature candidate rejected");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mp4::PayloadKind;

    fn atom(atom_type: &[u8; 4], payload_len: usize) -> Vec<u8> {
        let size = (8 + payload_len) as u32;
        let mut out = size.to_be_bytes().to_vec();
        out.extend_from_slice(atom_type);
        out.resize(8 + payload_len, 0);
        out
    }

    fn mp4(mdat_len: usize) -> Vec<u8> {
        let mut out = atom(b"ftyp", 12);
        out[8..12].copy_from_slice(b"isom");
        out.extend_from_slice(&atom(b"moov", 100));
        out.extend_from_slice(&atom(b"mdat", mdat_len));
        out
    }

    #[test]
    fn test_find_signature() {
        let buffer = b"xxftypyyftyp";
        assert_eq!(find_signature(buffer, 0), Some(2));
        assert_eq!(find_signature(buffer, 3), Some(8));
        assert_eq!(find_signature(buffer, 9), None);
        assert_eq!(find_signature(buffer, 100), None);
        assert_eq!(find_signature(b"ftp", 0), None);
    }

    #[test]
    fn test_scan_finds_embedded_file() {
        let file = mp4(2000);
        let mut buffer = vec![0x11; 300];
        buffer.extend_from_slice(&file);
        buffer.extend_from_slice(&[0x22; 10]);

        let payloads: Vec<_> = scan_for_payloads(&buffer).collect();
        assert_eq!(payloads.len(), 1);
        assert_eq!(payloads[0].start, 300);
        assert_eq!(payloads[0].kind, PayloadKind::Structured);
        assert_eq!(payloads[0].data, &file[..]);
    }

    #[test]
    fn test_scan_no_signature() {
        let buffer = vec![0u8; 4096];
        assert_eq!(scan_for_payloads(&buffer).count(), 0);
    }

    #[test]
    fn test_scan_skips_leading_signature() {
        // A file at offset 0 has its tag at 4, so a tag at 0 has no size field.
        let mut buffer = b"ftyp".to_vec();
        buffer.extend_from_slice(&[0u8; 2000]);
        buffer.extend_from_slice(b"mdat");

        let mut scanner = scan_for_payloads(&buffer);
        assert!(scanner.next().is_none());
        assert!(scanner.cursor() >= 1);
    }

    #[test]
    fn test_scan_rejects_small_payloads() {
        let buffer = mp4(100);
        assert!(buffer.len() < 1000);
        assert_eq!(scan_for_payloads(&buffer).count(), 0);

        let limits = ExtractLimits {
            min_payload_size: 64,
            ..Default::default()
        };
        assert_eq!(SignatureScanner::with_limits(&buffer, limits).count(), 1);
    }

    #[test]
    fn test_scan_reports_nested_files_separately() {
        let inner = mp4(1200);
        let mut outer = atom(b"ftyp", 12);
        outer.extend_from_slice(&atom(b"moov", 100));
        let mut mdat = atom(b"mdat", 0);
        mdat.extend_from_slice(&inner);
        let size = mdat.len() as u32;
        mdat[0..4].copy_from_slice(&size.to_be_bytes());
        outer.extend_from_slice(&mdat);

        let payloads: Vec<_> = scan_for_payloads(&outer).collect();
        assert_eq!(payloads.len(), 2);
        assert_eq!(payloads[0].start, 0);
        assert_eq!(payloads[0].len(), outer.len());
        assert_eq!(payloads[1].data, &inner[..]);
    }

    #[test]
    fn test_scan_two_files_back_to_back() {
        let first = mp4(1500);
        let second = mp4(3000);
        let mut buffer = first.clone();
        buffer.extend_from_slice(&second);

        let payloads: Vec<_> = scan_for_payloads(&buffer).collect();
        // The first walk swallows both files since they are valid siblings.
        assert_eq!(payloads.len(), 2);
        assert_eq!(payloads[0].len(), buffer.len());
        assert_eq!(payloads[1].start, first.len());
        assert_eq!(payloads[1].data, &second[..]);
    }
}
