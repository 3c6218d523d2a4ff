use btcore_quarks::keys;
use btcore_variant::Variant;

use crate::types::{FileEntry, Metainfo};

/// `true` iff `files` is the single implicit file [`crate::parse::parse`]
/// produces for an info dict with no `files` key: one entry whose path is
/// exactly the torrent name.
fn is_single_file(name: &str, files: &[FileEntry]) -> bool {
    files.len() == 1 && files[0].path.as_str() == name
}

/// Builds the `info` dictionary for a torrent with the given fields.
///
/// Shared by [`build_from_path`](crate::build_from_path), which needs the
/// info dict's encoded bytes to compute `info_hash` before a full
/// [`Metainfo`] exists, and [`to_variant`].
pub(crate) fn info_dict_variant(
    name: &str,
    piece_size: u64,
    piece_hashes: &[[u8; 20]],
    files: &[FileEntry],
    is_private: bool,
    source: Option<&str>,
) -> Variant<'static> {
    let mut info = Variant::new_map();
    info.try_emplace(keys::NAME, Variant::raw_string(name.as_bytes().to_vec())).unwrap();
    info.try_emplace(keys::PIECE_LENGTH, Variant::Int(piece_size as i64)).unwrap();

    let mut pieces = Vec::with_capacity(piece_hashes.len() * 20);
    for hash in piece_hashes {
        pieces.extend_from_slice(hash);
    }
    info.try_emplace(keys::PIECES, Variant::raw_string(pieces)).unwrap();

    if is_single_file(name, files) {
        info.try_emplace(keys::LENGTH, Variant::Int(files[0].length as i64)).unwrap();
        if let Some(md5sum) = &files[0].md5sum {
            info.try_emplace(keys::MD5SUM, Variant::raw_string(md5sum.clone().into_bytes())).unwrap();
        }
    } else {
        let entries = files
            .iter()
            .map(|file| {
                let mut entry = Variant::new_map();
                entry.try_emplace(keys::LENGTH, Variant::Int(file.length as i64)).unwrap();
                let path: Vec<Variant<'static>> = file
                    .path
                    .components()
                    .map(|c| Variant::raw_string(c.as_str().as_bytes().to_vec()))
                    .collect();
                entry.try_emplace(keys::PATH, Variant::Vector(path)).unwrap();
                if let Some(md5sum) = &file.md5sum {
                    entry.try_emplace(keys::MD5SUM, Variant::raw_string(md5sum.clone().into_bytes())).unwrap();
                }
                entry
            })
            .collect();
        info.try_emplace(keys::FILES, Variant::Vector(entries)).unwrap();
    }

    if is_private {
        info.try_emplace(keys::PRIVATE, Variant::Int(1)).unwrap();
    }
    if let Some(source) = source {
        info.try_emplace(keys::SOURCE, Variant::raw_string(source.as_bytes().to_vec())).unwrap();
    }

    info
}

/// Builds the full `.torrent` dictionary for `metainfo`: the outer fields
/// (`announce`/`announce-list`, `url-list`, `comment`, `created by`,
/// `creation date`, `encoding`) wrapped around its `info` dictionary.
#[must_use]
pub fn to_variant(metainfo: &Metainfo) -> Variant<'static> {
    let mut top = Variant::new_map();

    for (key, value) in btcore_announce_list::to_entries(&metainfo.announce_list) {
        top.try_emplace(key, value).unwrap();
    }

    if !metainfo.webseeds.is_empty() {
        let urls = metainfo.webseeds.iter().map(|w| Variant::raw_string(w.clone().into_bytes())).collect();
        top.try_emplace(keys::URL_LIST, Variant::Vector(urls)).unwrap();
    }
    if let Some(comment) = &metainfo.comment {
        top.try_emplace(keys::COMMENT, Variant::raw_string(comment.clone().into_bytes())).unwrap();
    }
    if let Some(creator) = &metainfo.creator {
        top.try_emplace(keys::CREATED_BY, Variant::raw_string(creator.clone().into_bytes())).unwrap();
    }
    if let Some(date_created) = metainfo.date_created {
        top.try_emplace(keys::CREATION_DATE, Variant::Int(date_created as i64)).unwrap();
    }
    top.try_emplace(keys::ENCODING, Variant::raw_string(b"UTF-8".to_vec())).unwrap();

    let info = info_dict_variant(
        &metainfo.name,
        metainfo.piece_size,
        &metainfo.piece_hashes,
        &metainfo.files,
        metainfo.is_private,
        metainfo.source.as_deref(),
    );
    top.try_emplace(keys::INFO, info).unwrap();

    Variant::Map(top)
}

/// Encodes `metainfo` as a `.torrent` byte stream.
#[must_use]
pub fn encode(metainfo: &Metainfo) -> Vec<u8> {
    btcore_bencode::encode(&to_variant(metainfo))
}
