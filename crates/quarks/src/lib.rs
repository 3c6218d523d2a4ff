//! Process-wide interned symbols ("quarks") shared by every other component
//! of the core: dictionary keys, settings-field names and tracker URLs are
//! all compared and hashed through a [`Quark`] rather than a byte slice.
//!
//! Entries are never removed once interned; [`intern`] always returns the
//! same id for the same bytes for the lifetime of the process, and
//! [`resolve`] hands back a `'static` view of the original bytes.

mod interner;
mod well_known;

pub use interner::{intern, lookup, resolve, InternError};
pub use well_known::{keys, WELL_KNOWN_STRS};

/// An interned byte string, identified by a small stable integer.
///
/// Two quarks compare equal iff the byte strings they were interned from
/// are equal; see [`intern`] and [`lookup`].
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Quark(pub(crate) u32);

impl Quark {
    /// The raw numeric id. Stable across processes for well-known keys
    /// (see [`keys`]); stable only within this process for user-interned
    /// keys.
    #[must_use]
    pub fn as_u32(self) -> u32 {
        self.0
    }

    /// The byte string this quark was interned from.
    #[must_use]
    pub fn as_bytes(self) -> &'static [u8] {
        resolve(self)
    }

    /// The byte string as `str`, if it is valid UTF-8.
    ///
    /// Every well-known key and every key produced by the bencode/JSON
    /// codecs from valid input is UTF-8, but a quark interned directly from
    /// arbitrary bytes need not be.
    #[must_use]
    pub fn as_str(self) -> Option<&'static str> {
        std::str::from_utf8(self.as_bytes()).ok()
    }

    /// Interns `s` and returns its quark.
    ///
    /// # Errors
    ///
    /// See [`intern`].
    pub fn from_str(s: &str) -> Result<Self, InternError> {
        intern(s.as_bytes())
    }
}

impl std::fmt::Display for Quark {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.as_str() {
            Some(s) => write!(f, "{s}"),
            None => write!(f, "{:?}", self.as_bytes()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_known_ids_sort_by_their_string() {
        let mut by_id: Vec<&str> = WELL_KNOWN_STRS.to_vec();
        let mut by_str = by_id.clone();
        by_id.sort_unstable();
        by_str.sort_unstable();
        assert_eq!(by_id, by_str);
    }

    #[test]
    fn quark_display_prints_the_interned_string() {
        let q = keys::NAME;
        assert_eq!(q.to_string(), "name");
    }
}
