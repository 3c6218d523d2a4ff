use btcore_announce_list::AnnounceList;
use camino::Utf8PathBuf;

use crate::hash::InfoHash;

/// One file described by a multi-file torrent's `files` list (or the single
/// implicit file of a single-file torrent).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileEntry {
    pub path: Utf8PathBuf,
    pub length: u64,
    pub md5sum: Option<String>,
}

/// A parsed or built torrent's metainfo.
#[derive(Debug)]
pub struct Metainfo {
    pub name: String,
    pub comment: Option<String>,
    pub source: Option<String>,
    pub creator: Option<String>,
    pub date_created: Option<u64>,
    pub is_private: bool,
    pub info_hash: InfoHash,
    pub piece_size: u64,
    pub piece_hashes: Vec<[u8; 20]>,
    pub files: Vec<FileEntry>,
    pub webseeds: Vec<String>,
    pub announce_list: AnnounceList,
}

impl Metainfo {
    #[must_use]
    pub fn piece_count(&self) -> usize {
        self.piece_hashes.len()
    }

    #[must_use]
    pub fn total_size(&self) -> u64 {
        self.files.iter().map(|f| f.length).sum()
    }
}
