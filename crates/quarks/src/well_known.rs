use crate::Quark;

/// Strings for the build-time key table, sorted in ascending byte order.
///
/// Keeping this sorted is load-bearing: [`crate::lookup`] binary-searches it
/// before falling back to the user-interned table, and the index of a string
/// here *is* its [`Quark`] id.
pub const WELL_KNOWN_STRS: &[&str] = &[
    "announce",
    "announce-list",
    "bencode-string-limit",
    "comment",
    "created by",
    "creation date",
    "encoding",
    "files",
    "info",
    "length",
    "md5sum",
    "metadata-piece-timeout-secs",
    "name",
    "nodes",
    "path",
    "piece length",
    "pieces",
    "private",
    "recent-history-window-secs",
    "recursion-limit",
    "source",
    "url-list",
];

const fn index_of(target: &str) -> usize {
    let target = target.as_bytes();
    let mut i = 0;
    while i < WELL_KNOWN_STRS.len() {
        let candidate = WELL_KNOWN_STRS[i].as_bytes();
        if bytes_eq(candidate, target) {
            return i;
        }
        i += 1;
    }
    panic!("well-known quark key missing from WELL_KNOWN_STRS");
}

const fn bytes_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut i = 0;
    while i < a.len() {
        if a[i] != b[i] {
            return false;
        }
        i += 1;
    }
    true
}

/// Compile-time-checked ids for the keys every component needs by name.
///
/// Adding an entry here only requires adding the matching string to
/// [`WELL_KNOWN_STRS`] in the correct sorted position; `index_of` fails to
/// compile (via a `const` panic) if the two tables drift apart.
pub mod keys {
    use super::{index_of, Quark};

    pub const ANNOUNCE: Quark = Quark(index_of("announce") as u32);
    pub const ANNOUNCE_LIST: Quark = Quark(index_of("announce-list") as u32);
    pub const BENCODE_STRING_LIMIT: Quark = Quark(index_of("bencode-string-limit") as u32);
    pub const COMMENT: Quark = Quark(index_of("comment") as u32);
    pub const CREATED_BY: Quark = Quark(index_of("created by") as u32);
    pub const CREATION_DATE: Quark = Quark(index_of("creation date") as u32);
    pub const ENCODING: Quark = Quark(index_of("encoding") as u32);
    pub const FILES: Quark = Quark(index_of("files") as u32);
    pub const INFO: Quark = Quark(index_of("info") as u32);
    pub const LENGTH: Quark = Quark(index_of("length") as u32);
    pub const MD5SUM: Quark = Quark(index_of("md5sum") as u32);
    pub const METADATA_PIECE_TIMEOUT_SECS: Quark = Quark(index_of("metadata-piece-timeout-secs") as u32);
    pub const NAME: Quark = Quark(index_of("name") as u32);
    pub const NODES: Quark = Quark(index_of("nodes") as u32);
    pub const PATH: Quark = Quark(index_of("path") as u32);
    pub const PIECE_LENGTH: Quark = Quark(index_of("piece length") as u32);
    pub const PIECES: Quark = Quark(index_of("pieces") as u32);
    pub const PRIVATE: Quark = Quark(index_of("private") as u32);
    pub const RECENT_HISTORY_WINDOW_SECS: Quark = Quark(index_of("recent-history-window-secs") as u32);
    pub const RECURSION_LIMIT: Quark = Quark(index_of("recursion-limit") as u32);
    pub const SOURCE: Quark = Quark(index_of("source") as u32);
    pub const URL_LIST: Quark = Quark(index_of("url-list") as u32);
}

#[cfg(test)]
mod tests {
    use super::WELL_KNOWN_STRS;

    #[test]
    fn well_known_strs_are_sorted() {
        let mut sorted = WELL_KNOWN_STRS.to_vec();
        sorted.sort_unstable();
        assert_eq!(WELL_KNOWN_STRS, sorted.as_slice());
    }

    #[test]
    fn well_known_strs_has_no_duplicates() {
        let mut seen = WELL_KNOWN_STRS.to_vec();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), WELL_KNOWN_STRS.len());
    }
}
