/// A string variant's payload: either the bytes are owned by the variant, or
/// the variant carries an "unmanaged" view into a buffer the caller
/// guarantees will outlive it.
///
/// [`Variant::bytes`](crate::Variant::bytes) hands back a `&[u8]` regardless
/// of which case this is; callers that don't care about ownership never need
/// to match on it directly.
#[derive(Clone, Debug)]
pub enum VString<'a> {
    Owned(Box<[u8]>),
    Borrowed(&'a [u8]),
}

impl<'a> VString<'a> {
    /// Copies `bytes` so the variant owns its storage.
    #[must_use]
    pub fn owned(bytes: impl Into<Box<[u8]>>) -> Self {
        Self::Owned(bytes.into())
    }

    /// Wraps `bytes` without copying; `bytes` must outlive the variant.
    #[must_use]
    pub fn unmanaged(bytes: &'a [u8]) -> Self {
        Self::Borrowed(bytes)
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Owned(b) => b,
            Self::Borrowed(b) => b,
        }
    }

    #[must_use]
    pub fn is_borrowed(&self) -> bool {
        matches!(self, Self::Borrowed(_))
    }

    /// Returns a `VString` that owns its bytes, copying if this one borrowed.
    #[must_use]
    pub fn into_owned(self) -> VString<'static> {
        match self {
            Self::Owned(b) => VString::Owned(b),
            Self::Borrowed(b) => VString::Owned(b.to_vec().into_boxed_slice()),
        }
    }
}

impl PartialEq for VString<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl Eq for VString<'_> {}

impl<'a> From<&'a str> for VString<'a> {
    fn from(s: &'a str) -> Self {
        Self::Borrowed(s.as_bytes())
    }
}

impl From<String> for VString<'static> {
    fn from(s: String) -> Self {
        Self::Owned(s.into_bytes().into_boxed_slice())
    }
}

impl From<Vec<u8>> for VString<'static> {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Owned(bytes.into_boxed_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_agree_regardless_of_ownership() {
        let owned = VString::owned(b"hello".to_vec());
        let borrowed = VString::unmanaged(b"hello");
        assert_eq!(owned.as_bytes(), borrowed.as_bytes());
        assert_eq!(owned, borrowed);
    }

    #[test]
    fn into_owned_detaches_from_the_source_buffer() {
        let source = b"transient".to_vec();
        let borrowed = VString::unmanaged(&source);
        let owned = borrowed.into_owned();
        drop(source);
        assert_eq!(owned.as_bytes(), b"transient");
    }
}
