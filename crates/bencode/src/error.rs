use thiserror::Error;

/// A bencode decode failure, located at the first byte that could not be
/// interpreted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind} at byte {pos}")]
pub struct BencodeError {
    pub pos: usize,
    pub kind: BencodeErrorKind,
}

impl BencodeError {
    #[must_use]
    pub fn new(pos: usize, kind: BencodeErrorKind) -> Self {
        Self { pos, kind }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BencodeErrorKind {
    #[error("ran out of bytes")]
    BytesEmpty,
    #[error("invalid byte, expected the start of an int, string, list or dict")]
    InvalidByte,
    #[error("integer has no terminating 'e'")]
    IntNoDelimiter,
    #[error("integer is negative zero")]
    IntNegativeZero,
    #[error("integer has illegal leading zero")]
    IntZeroPadding,
    #[error("integer does not parse as a signed 64-bit value")]
    IntParseError,
    #[error("byte string length is negative")]
    LengthNegative,
    #[error("byte string length runs past the end of the input")]
    LengthOverflow,
    #[error("byte string length {len} exceeds the {cap}-byte cap")]
    StringTooLong { len: usize, cap: usize },
    #[error("dictionary key {key:?} is out of order")]
    KeyOrdering { key: Vec<u8> },
    #[error("dictionary key {key:?} is duplicated")]
    KeyDuplicate { key: Vec<u8> },
    #[error("nesting exceeded the recursion limit of {max}")]
    TooDeep { max: usize },
    #[error("failed to intern dictionary key {key:?}")]
    InternFailed { key: Vec<u8> },
    #[error("trailing bytes after the top-level value")]
    TrailingBytes,
}
