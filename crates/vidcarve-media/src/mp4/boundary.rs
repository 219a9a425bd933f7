//! Flat atom walk and payload boundary detection.

use super::{Atom, AtomType, ExtractLimits, Payload, PayloadKind, ATOM_HEADER_SIZE};
use tracing::trace;

/// Walk sibling atoms starting at `start`.
///
/// The walk stops at the first header that cannot be a complete atom: fewer
/// than eight bytes left, a size below the header size, or a size running
/// past the end of the buffer. Whatever was collected up to that point is
/// returned. Children are never visited.
pub fn read_atoms(buffer: &[u8], start: usize) -> Vec<Atom> {
    let mut atoms = Vec::new();
    let mut pos = start;

    while pos <= buffer.len() && buffer.len() - pos >= ATOM_HEADER_SIZE {
        let remaining = buffer.len() - pos;
        let header = &buffer[pos..pos + ATOM_HEADER_SIZE];

        let size = u32::from_be_bytes([header[0], header[1], header[2], header[3]]) as usize;
        let atom_type = AtomType::from_bytes([header[4], header[5], header[6], header[7]]);

        if size < ATOM_HEADER_SIZE || size > remaining {
            break;
        }

        atoms.push(Atom {
            atom_type,
            offset: pos,
            size,
        });

        pos += size;
    }

    atoms
}

/// Extract the MP4 file starting at `start` using default limits.
///
/// Returns the borrowed bytes of the payload, or `None` when neither the
/// structured nor the windowed path accepts the candidate.
pub fn extract_structured_payload(buffer: &[u8], start: usize) -> Option<&[u8]> {
    extract_payload(buffer, start, &ExtractLimits::default()).map(|p| p.data)
}

/// Extract the MP4 file starting at `start`.
///
/// With a `moov` atom among the siblings the payload runs to the end of the
/// last sibling and must carry `ftyp` right after its size field. Without one
/// a window of at most `limits.max_window` bytes is taken, provided at least
/// `limits.min_payload_size` bytes remain and the window mentions `moov` or
/// `mdat` somewhere.
pub fn extract_payload<'a>(
    buffer: &'a [u8],
    start: usize,
    limits: &ExtractLimits,
) -> Option<Payload<'a>> {
    let atoms = read_atoms(buffer, start);
    let last = atoms.last()?;

    let has_moov = atoms.iter().any(|a| a.atom_type == AtomType::MOOV);
    let has_mdat = atoms.iter().any(|a| a.atom_type == AtomType::MDAT);
    trace!(
        start,
        atoms = atoms.len(),
        has_moov,
        has_mdat,
        "Walked atoms"
    );

    if has_moov {
        let end = last.end();
        let data = &buffer[start..end];
        if data.get(4..ATOM_HEADER_SIZE) == Some(AtomType::FTYP.as_bytes()) {
            return Some(Payload {
                start,
                end,
                kind: PayloadKind::Structured,
                data,
            });
        }
        trace!(start, end, "Atom span does not start with ftyp");
    }

    let remaining = buffer.len() - start;
    if remaining < limits.min_payload_size {
        return None;
    }

    let end = start + remaining.min(limits.max_window);
    let data = &buffer[start..end];
    if contains_tag(data, AtomType::MOOV) || contains_tag(data, AtomType::MDAT) {
        return Some(Payload {
            start,
            end,
            kind: PayloadKind::Windowed,
            data,
        });
    }

    None
}

fn contains_tag(data: &[u8], tag: AtomType) -> bool {
    data.windows(4).any(|w| w == tag.as_bytes())
}
