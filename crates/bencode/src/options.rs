const DEFAULT_MAX_RECURSION: usize = 512;
const DEFAULT_MAX_STRING_LEN: usize = 128 * 1024 * 1024;
const DEFAULT_CHECK_KEY_SORT: bool = false;
const DEFAULT_ENFORCE_FULL_DECODE: bool = false;

/// Tunables for [`crate::decode`].
///
/// The BEP-3 grammar checks that always apply (no leading zeros, no negative
/// zero, unique dictionary keys, bounded recursion) aren't configurable;
/// these options cover the places real-world encoders disagree on strictness.
#[derive(Copy, Clone, Debug)]
pub struct BDecodeOpts {
    max_recursion: usize,
    max_string_len: usize,
    check_key_sort: bool,
    enforce_full_decode: bool,
}

impl BDecodeOpts {
    #[must_use]
    pub fn new(max_recursion: usize, max_string_len: usize, check_key_sort: bool, enforce_full_decode: bool) -> Self {
        Self {
            max_recursion,
            max_string_len,
            check_key_sort,
            enforce_full_decode,
        }
    }

    #[must_use]
    pub fn max_recursion(&self) -> usize {
        self.max_recursion
    }

    #[must_use]
    pub fn max_string_len(&self) -> usize {
        self.max_string_len
    }

    #[must_use]
    pub fn check_key_sort(&self) -> bool {
        self.check_key_sort
    }

    #[must_use]
    pub fn enforce_full_decode(&self) -> bool {
        self.enforce_full_decode
    }

    #[must_use]
    pub fn with_max_recursion(mut self, max_recursion: usize) -> Self {
        self.max_recursion = max_recursion;
        self
    }

    #[must_use]
    pub fn with_max_string_len(mut self, max_string_len: usize) -> Self {
        self.max_string_len = max_string_len;
        self
    }

    #[must_use]
    pub fn with_check_key_sort(mut self, check_key_sort: bool) -> Self {
        self.check_key_sort = check_key_sort;
        self
    }

    #[must_use]
    pub fn with_enforce_full_decode(mut self, enforce_full_decode: bool) -> Self {
        self.enforce_full_decode = enforce_full_decode;
        self
    }
}

impl Default for BDecodeOpts {
    fn default() -> Self {
        Self::new(
            DEFAULT_MAX_RECURSION,
            DEFAULT_MAX_STRING_LEN,
            DEFAULT_CHECK_KEY_SORT,
            DEFAULT_ENFORCE_FULL_DECODE,
        )
    }
}
