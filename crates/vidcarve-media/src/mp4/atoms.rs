//! MP4 atom definitions.

/// Size of a compact atom header: 32-bit size followed by the type code.
pub const ATOM_HEADER_SIZE: usize = 8;

/// Four-character atom type code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AtomType(pub [u8; 4]);

impl AtomType {
    pub const FTYP: Self = Self(*b"ftyp");
    pub const MOOV: Self = Self(*b"moov");
    pub const MDAT: Self = Self(*b"mdat");

    /// Create from bytes.
    pub fn from_bytes(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }

    /// Raw type code.
    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }

    /// Get the 4-char code as a string.
    pub fn as_str(&self) -> &str {
        std::str::from_utf8(&self.0).unwrap_or("????")
    }
}

impl std::fmt::Display for AtomType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One length-prefixed atom located inside a buffer.
///
/// `offset` points at the size field, so the atom occupies
/// `buffer[offset..offset + size]` including its header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Atom {
    /// Atom type code.
    pub atom_type: AtomType,
    /// Buffer offset of the atom header.
    pub offset: usize,
    /// Atom size including header.
    pub size: usize,
}

impl Atom {
    /// Offset one past the last byte of the atom.
    pub fn end(&self) -> usize {
        self.offset + self.size
    }
}
