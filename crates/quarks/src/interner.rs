use std::collections::HashMap;
use std::sync::{OnceLock, RwLock};

use thiserror::Error;

use crate::well_known::WELL_KNOWN_STRS;
use crate::Quark;

/// Failure interning a new string.
///
/// The only documented failure mode is allocation exhaustion; in practice
/// that surfaces as a process abort long before this error is observable,
/// but the type exists so callers have somewhere to route it.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InternError {
    #[error("failed to allocate storage for an interned string")]
    AllocationFailed,
}

/// User-interned entries, appended to but never removed from.
///
/// Every stored byte string is leaked to `'static` once, so the id -> bytes
/// table never has to worry about a `Vec` growth invalidating a view handed
/// out earlier; only the pointer table (the `Vec<&'static [u8]>` itself)
/// reallocates, never the leaked payloads it points at.
struct Table {
    by_id: Vec<&'static [u8]>,
    by_bytes: HashMap<&'static [u8], Quark>,
}

impl Table {
    fn new() -> Self {
        Self {
            by_id: Vec::new(),
            by_bytes: HashMap::new(),
        }
    }
}

static TABLE: OnceLock<RwLock<Table>> = OnceLock::new();

fn table() -> &'static RwLock<Table> {
    TABLE.get_or_init(|| RwLock::new(Table::new()))
}

fn well_known_lookup(bytes: &[u8]) -> Option<Quark> {
    WELL_KNOWN_STRS
        .binary_search_by(|candidate| candidate.as_bytes().cmp(bytes))
        .ok()
        .map(|index| Quark(index as u32))
}

/// Stores `bytes` with one trailing NUL so the leaked slice honors the
/// "zero-terminated at `len()`" contract without exposing the NUL itself.
fn leak_with_nul(bytes: &[u8]) -> &'static [u8] {
    let mut owned = Vec::with_capacity(bytes.len() + 1);
    owned.extend_from_slice(bytes);
    owned.push(0);
    let leaked: &'static mut [u8] = Box::leak(owned.into_boxed_slice());
    &leaked[..bytes.len()]
}

/// Returns the id for `bytes` iff it has already been interned.
///
/// Safe to call concurrently from any number of threads; it never blocks on
/// another in-flight `lookup`.
#[must_use]
pub fn lookup(bytes: &[u8]) -> Option<Quark> {
    if let Some(q) = well_known_lookup(bytes) {
        return Some(q);
    }
    table().read().expect("quark table poisoned").by_bytes.get(bytes).copied()
}

/// Returns the id for `bytes`, interning it if this is the first time it has
/// been seen.
///
/// # Errors
///
/// Returns [`InternError::AllocationFailed`] only if storage for the new
/// entry cannot be allocated.
pub fn intern(bytes: &[u8]) -> Result<Quark, InternError> {
    if let Some(q) = well_known_lookup(bytes) {
        return Ok(q);
    }

    {
        let table = table().read().expect("quark table poisoned");
        if let Some(q) = table.by_bytes.get(bytes) {
            return Ok(*q);
        }
    }

    let mut table = table().write().expect("quark table poisoned");
    // Re-check: another writer may have interned the same bytes while we
    // waited for the write lock.
    if let Some(q) = table.by_bytes.get(bytes) {
        return Ok(*q);
    }

    let leaked = leak_with_nul(bytes);
    let id = Quark((WELL_KNOWN_STRS.len() + table.by_id.len()) as u32);
    table.by_id.push(leaked);
    table.by_bytes.insert(leaked, id);
    tracing::trace!(quark = id.0, len = bytes.len(), "interned new quark");
    Ok(id)
}

/// Returns the byte string associated with `id`.
///
/// # Panics
///
/// Panics if `id` was never produced by [`lookup`] or [`intern`] in this
/// process; a `Quark` is only ever valid for the process that created it.
#[must_use]
pub fn resolve(id: Quark) -> &'static [u8] {
    let index = id.0 as usize;
    if index < WELL_KNOWN_STRS.len() {
        return WELL_KNOWN_STRS[index].as_bytes();
    }
    let table = table().read().expect("quark table poisoned");
    table.by_id[index - WELL_KNOWN_STRS.len()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::well_known::keys;

    #[test]
    fn well_known_ids_are_stable() {
        assert_eq!(resolve(keys::ANNOUNCE), b"announce");
        assert_eq!(resolve(keys::PIECES), b"pieces");
    }

    #[test]
    fn well_known_lookup_uses_the_sorted_table() {
        assert_eq!(lookup(b"name"), Some(keys::NAME));
        assert_eq!(lookup(b"does-not-exist"), None);
    }

    #[test]
    fn intern_round_trips() {
        let bytes = b"x-custom-key-for-tests";
        let id = intern(bytes).unwrap();
        assert_eq!(resolve(id), &bytes[..]);
        assert_eq!(intern(bytes).unwrap(), id, "interning twice returns the same id");
    }

    #[test]
    fn intern_then_lookup_agree() {
        let bytes = b"x-another-custom-key";
        let id = intern(bytes).unwrap();
        assert_eq!(lookup(bytes), Some(id));
    }

    #[test]
    fn distinct_bytes_never_collide() {
        let a = intern(b"x-distinct-a").unwrap();
        let b = intern(b"x-distinct-b").unwrap();
        assert_ne!(a, b);
    }
}
