//! Shared fixtures for integration tests.
//!
//! Builds minimal MP4 byte layouts that the boundary parser accepts.

#![allow(dead_code)]

/// Build one atom with a zero-filled payload.
pub fn atom(atom_type: &[u8; 4], payload_len: usize) -> Vec<u8> {
    let size = (8 + payload_len) as u32;
    let mut out = size.to_be_bytes().to_vec();
    out.extend_from_slice(atom_type);
    out.resize(8 + payload_len, 0);
    out
}

/// Build an `ftyp` + `moov` + `mdat` file whose media data is `mdat_len` bytes.
pub fn mp4(mdat_len: usize) -> Vec<u8> {
    let mut out = atom(b"ftyp", 16);
    out[8..12].copy_from_slice(b"isom");
    out[16..20].copy_from_slice(b"mp41");
    out.extend_from_slice(&atom(b"moov", 256));

    let mut mdat = atom(b"mdat", mdat_len);
    for (i, byte) in mdat[8..].iter_mut().enumerate() {
        *byte = (i % 251) as u8;
    }
    out.extend_from_slice(&mdat);
    out
}

/// Wrap `payload` in filler bytes the way an archive would.
pub fn embed(prefix_len: usize, payload: &[u8], suffix_len: usize) -> Vec<u8> {
    let mut out = vec![0x5Cu8; prefix_len];
    out.extend_from_slice(payload);
    out.extend(std::iter::repeat(0xC5u8).take(suffix_len));
    out
}
