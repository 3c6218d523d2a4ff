use btcore_quarks::keys;
use btcore_serializer::Field;
use serde::{Deserialize, Serialize};

/// Default bencode string-length cap, in bytes; mirrors
/// `btcore_bencode::BDecodeOpts`'s own default.
pub const DEFAULT_BENCODE_STRING_LIMIT: u64 = 128 * 1024 * 1024;

/// Default bencode/JSON recursion cap; mirrors `btcore_bencode::BDecodeOpts`'s
/// own default.
pub const DEFAULT_RECURSION_LIMIT: u64 = 512;

/// Default quiet period, in seconds, between re-requesting the same
/// metadata-transfer piece.
pub const DEFAULT_METADATA_PIECE_TIMEOUT_SECS: u64 = 3;

/// Default window, in seconds, a `RecentHistory` counter is queried over.
pub const DEFAULT_RECENT_HISTORY_WINDOW_SECS: u64 = 3600;

/// Crate-level tunables that are genuinely configuration rather than
/// protocol constants: how permissive the bencode/JSON parsers are, how
/// long a BEP-9 metadata-transfer piece request waits before it can be
/// re-sent, and the window a recent-activity counter is queried over.
#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone, Copy)]
pub struct Limits {
    /// Maximum length, in bytes, of a single bencode/JSON string.
    pub bencode_string_limit: u64,
    /// Maximum nesting depth a bencode/JSON document may use.
    pub recursion_limit: u64,
    /// Seconds a metadata-transfer piece request waits before it becomes
    /// eligible to be requested again.
    pub metadata_piece_timeout_secs: u64,
    /// Seconds of history a `RecentHistory` counter is queried over.
    pub recent_history_window_secs: u64,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            bencode_string_limit: DEFAULT_BENCODE_STRING_LIMIT,
            recursion_limit: DEFAULT_RECURSION_LIMIT,
            metadata_piece_timeout_secs: DEFAULT_METADATA_PIECE_TIMEOUT_SECS,
            recent_history_window_secs: DEFAULT_RECENT_HISTORY_WINDOW_SECS,
        }
    }
}

/// The field table that lets [`Limits`] round-trip through
/// [`btcore_variant::Variant`] via `btcore_serializer`; this is the worked
/// example for that crate's field-table machinery.
#[must_use]
pub fn fields() -> Vec<Field<Limits>> {
    vec![
        Field::new(
            keys::BENCODE_STRING_LIMIT,
            |l| &l.bencode_string_limit,
            |l| &mut l.bencode_string_limit,
        ),
        Field::new(keys::RECURSION_LIMIT, |l| &l.recursion_limit, |l| &mut l.recursion_limit),
        Field::new(
            keys::METADATA_PIECE_TIMEOUT_SECS,
            |l| &l.metadata_piece_timeout_secs,
            |l| &mut l.metadata_piece_timeout_secs,
        ),
        Field::new(
            keys::RECENT_HISTORY_WINDOW_SECS,
            |l| &l.recent_history_window_secs,
            |l| &mut l.recent_history_window_secs,
        ),
    ]
}
