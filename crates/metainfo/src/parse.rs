use btcore_bencode::{BDecodeOpts, ParseMode};
use btcore_quarks::keys;
use btcore_variant::{VMap, Variant};

use crate::error::MetainfoError;
use crate::hash::InfoHash;
use crate::path::sanitize_subpath;
use crate::types::{FileEntry, Metainfo};

fn read_bencode_string(bytes: &[u8], pos: usize) -> Result<(&[u8], usize), MetainfoError> {
    let colon = bytes[pos..]
        .iter()
        .position(|&b| b == b':')
        .ok_or_else(|| MetainfoError::ParseFailure("malformed bencode string while locating info span".to_string()))?;
    let len: usize = std::str::from_utf8(&bytes[pos..pos + colon])
        .ok()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| MetainfoError::ParseFailure("malformed bencode string length".to_string()))?;
    let start = pos + colon + 1;
    let end = start
        .checked_add(len)
        .filter(|&end| end <= bytes.len())
        .ok_or_else(|| MetainfoError::ParseFailure("bencode string runs past end of input".to_string()))?;
    Ok((&bytes[start..end], end))
}

/// Walks one bencode value starting at `pos` without building anything,
/// returning the position just past it. Used only to recover the exact
/// byte span of the info dictionary; the document has already been
/// strictly validated by [`btcore_bencode::decode`] by the time this runs.
fn skip_value(bytes: &[u8], pos: usize) -> Result<usize, MetainfoError> {
    match bytes.get(pos) {
        Some(b'i') => {
            let e = bytes[pos..]
                .iter()
                .position(|&b| b == b'e')
                .ok_or_else(|| MetainfoError::ParseFailure("unterminated integer".to_string()))?;
            Ok(pos + e + 1)
        }
        Some(b'l') => {
            let mut p = pos + 1;
            while bytes.get(p) != Some(&b'e') {
                p = skip_value(bytes, p)?;
            }
            Ok(p + 1)
        }
        Some(b'd') => {
            let mut p = pos + 1;
            while bytes.get(p) != Some(&b'e') {
                let (_, after_key) = read_bencode_string(bytes, p)?;
                p = skip_value(bytes, after_key)?;
            }
            Ok(p + 1)
        }
        Some(c) if c.is_ascii_digit() => {
            let (_, after) = read_bencode_string(bytes, pos)?;
            Ok(after)
        }
        _ => Err(MetainfoError::ParseFailure("unexpected byte while locating info span".to_string())),
    }
}

/// Finds the exact `[start, end)` byte range of the `info` value within a
/// top-level bencode dictionary.
fn locate_info_span(bytes: &[u8]) -> Result<(usize, usize), MetainfoError> {
    if bytes.first() != Some(&b'd') {
        return Err(MetainfoError::ParseFailure("top-level value is not a dictionary".to_string()));
    }
    let mut p = 1;
    while bytes.get(p) != Some(&b'e') {
        let (key, after_key) = read_bencode_string(bytes, p)?;
        if key == b"info" {
            let end = skip_value(bytes, after_key)?;
            return Ok((after_key, end));
        }
        p = skip_value(bytes, after_key)?;
    }
    Err(MetainfoError::ParseFailure("missing info dictionary".to_string()))
}

fn webseeds_of(top: &VMap<'_>) -> Vec<String> {
    match top.find(keys::URL_LIST) {
        Some(Variant::String(_)) => top
            .find(keys::URL_LIST)
            .and_then(Variant::str)
            .map(|s| vec![s.to_string()])
            .unwrap_or_default(),
        Some(Variant::Vector(v)) => v.iter().filter_map(Variant::str).map(String::from).collect(),
        _ => Vec::new(),
    }
}

fn file_path_of(entry: &VMap<'_>) -> Result<Vec<String>, MetainfoError> {
    let components = entry
        .find(keys::PATH)
        .and_then(Variant::vector)
        .ok_or_else(|| MetainfoError::ParseFailure("file entry missing path".to_string()))?;
    components
        .iter()
        .map(|c| {
            c.str()
                .map(String::from)
                .ok_or_else(|| MetainfoError::ParseFailure("non-string path component".to_string()))
        })
        .collect()
}

fn files_of(info: &VMap<'_>, name: &str) -> Result<Vec<FileEntry>, MetainfoError> {
    if let Some(files) = info.find(keys::FILES).and_then(Variant::vector) {
        files
            .iter()
            .map(|entry| {
                let entry_map = entry
                    .map()
                    .ok_or_else(|| MetainfoError::ParseFailure("files entry is not a dictionary".to_string()))?;
                let length = entry_map
                    .find(keys::LENGTH)
                    .and_then(Variant::int)
                    .ok_or_else(|| MetainfoError::ParseFailure("file entry missing length".to_string()))?;
                let path = sanitize_subpath(&file_path_of(entry_map)?)?;
                let md5sum = entry_map.find(keys::MD5SUM).and_then(Variant::str).map(String::from);
                Ok(FileEntry {
                    path,
                    length: length.max(0) as u64,
                    md5sum,
                })
            })
            .collect()
    } else {
        let length = info
            .find(keys::LENGTH)
            .and_then(Variant::int)
            .ok_or_else(|| MetainfoError::ParseFailure("info dict missing length or files".to_string()))?;
        let path = sanitize_subpath(&[name.to_string()])?;
        let md5sum = info.find(keys::MD5SUM).and_then(Variant::str).map(String::from);
        Ok(vec![FileEntry {
            path,
            length: length.max(0) as u64,
            md5sum,
        }])
    }
}

/// Parses a `.torrent` byte stream into a [`Metainfo`].
///
/// # Errors
///
/// Returns [`MetainfoError::ParseFailure`] if the bytes aren't valid
/// bencode, the top-level structure doesn't match BEP-3, or a file path
/// isn't present; [`MetainfoError::PathUnsafe`] if a file path fails
/// portable-subpath validation.
pub fn parse(bytes: &[u8]) -> Result<Metainfo, MetainfoError> {
    let opts = BDecodeOpts::default().with_enforce_full_decode(true);
    let (top, _consumed) =
        btcore_bencode::decode(bytes, opts, ParseMode::Owned).map_err(|e| MetainfoError::ParseFailure(e.to_string()))?;
    let top_map = top
        .map()
        .ok_or_else(|| MetainfoError::ParseFailure("top-level value is not a dictionary".to_string()))?;

    let info = top_map
        .find(keys::INFO)
        .and_then(Variant::map)
        .ok_or_else(|| MetainfoError::ParseFailure("missing info dictionary".to_string()))?;

    let (start, end) = locate_info_span(bytes)?;
    let info_hash = InfoHash::of(&bytes[start..end]);

    let name = info
        .find(keys::NAME)
        .and_then(Variant::str)
        .ok_or_else(|| MetainfoError::ParseFailure("info dict missing name".to_string()))?
        .to_string();

    let piece_size = info
        .find(keys::PIECE_LENGTH)
        .and_then(Variant::int)
        .filter(|&n| n > 0)
        .ok_or_else(|| MetainfoError::ParseFailure("info dict missing piece length".to_string()))? as u64;

    let pieces_bytes = info
        .find(keys::PIECES)
        .and_then(Variant::bytes)
        .ok_or_else(|| MetainfoError::ParseFailure("info dict missing pieces".to_string()))?;
    if pieces_bytes.len() % 20 != 0 {
        return Err(MetainfoError::ParseFailure(
            "pieces byte string length is not a multiple of 20".to_string(),
        ));
    }
    let piece_hashes: Vec<[u8; 20]> = pieces_bytes
        .chunks(20)
        .map(|c| c.try_into().expect("chunk length is exactly 20"))
        .collect();

    let is_private = info.find(keys::PRIVATE).is_some_and(|v| v.value_bool().unwrap_or(false));
    let source = info.find(keys::SOURCE).and_then(Variant::str).map(String::from);

    let files = files_of(info, &name)?;

    let comment = top_map.find(keys::COMMENT).and_then(Variant::str).map(String::from);
    let creator = top_map.find(keys::CREATED_BY).and_then(Variant::str).map(String::from);
    let date_created = top_map.find(keys::CREATION_DATE).and_then(Variant::int).map(|i| i.max(0) as u64);
    let webseeds = webseeds_of(top_map);

    let announce = top_map.find(keys::ANNOUNCE).and_then(Variant::str);
    let announce_list_variant = top_map.find(keys::ANNOUNCE_LIST);
    let announce_list = btcore_announce_list::from_variant(announce, announce_list_variant);

    let metainfo = Metainfo {
        name,
        comment,
        source,
        creator,
        date_created,
        is_private,
        info_hash,
        piece_size,
        piece_hashes,
        files,
        webseeds,
        announce_list,
    };

    if metainfo.piece_count() > 0 {
        let total = metainfo.total_size();
        let min = (metainfo.piece_count() as u64 - 1) * piece_size + 1;
        let max = metainfo.piece_count() as u64 * piece_size;
        if total < min || total > max {
            return Err(MetainfoError::ParseFailure(format!(
                "total size {total} is incompatible with {} pieces of size {piece_size}",
                metainfo.piece_count()
            )));
        }
    }

    Ok(metainfo)
}

#[cfg(test)]
mod tests {
    use btcore_quarks::keys;
    use btcore_variant::Variant;

    use super::*;

    fn single_file_torrent_bytes() -> Vec<u8> {
        let mut info = Variant::new_map();
        info.try_emplace(keys::NAME, Variant::raw_string(b"hello.txt".to_vec())).unwrap();
        info.try_emplace(keys::PIECE_LENGTH, Variant::Int(16_384)).unwrap();
        info.try_emplace(keys::PIECES, Variant::raw_string(vec![0u8; 20])).unwrap();
        info.try_emplace(keys::LENGTH, Variant::Int(10)).unwrap();

        let mut top = Variant::new_map();
        top.try_emplace(keys::ANNOUNCE, Variant::raw_string(b"http://tracker.example/announce".to_vec()))
            .unwrap();
        top.try_emplace(keys::INFO, info).unwrap();
        btcore_bencode::encode(&top)
    }

    #[test]
    fn parses_a_single_file_torrent() {
        let bytes = single_file_torrent_bytes();
        let metainfo = parse(&bytes).unwrap();
        assert_eq!(metainfo.name, "hello.txt");
        assert_eq!(metainfo.piece_count(), 1);
        assert_eq!(metainfo.files.len(), 1);
        assert_eq!(metainfo.files[0].length, 10);
        assert_eq!(metainfo.announce_list.len(), 1);
    }

    #[test]
    fn info_hash_is_stable_for_the_same_bytes() {
        let bytes = single_file_torrent_bytes();
        let a = parse(&bytes).unwrap();
        let b = parse(&bytes).unwrap();
        assert_eq!(a.info_hash, b.info_hash);
    }

    #[test]
    fn rejects_pieces_not_a_multiple_of_twenty() {
        let mut info = Variant::new_map();
        info.try_emplace(keys::NAME, Variant::raw_string(b"x".to_vec())).unwrap();
        info.try_emplace(keys::PIECE_LENGTH, Variant::Int(16_384)).unwrap();
        info.try_emplace(keys::PIECES, Variant::raw_string(vec![0u8; 7])).unwrap();
        info.try_emplace(keys::LENGTH, Variant::Int(1)).unwrap();
        let mut top = Variant::new_map();
        top.try_emplace(keys::INFO, info).unwrap();
        let bytes = btcore_bencode::encode(&top);
        assert!(parse(&bytes).is_err());
    }

    #[test]
    fn rejects_unsafe_file_paths() {
        let mut file_entry = Variant::new_map();
        file_entry.try_emplace(keys::LENGTH, Variant::Int(5)).unwrap();
        file_entry
            .try_emplace(keys::PATH, Variant::Vector(vec![Variant::raw_string(b"..".to_vec())]))
            .unwrap();

        let mut info = Variant::new_map();
        info.try_emplace(keys::NAME, Variant::raw_string(b"pack".to_vec())).unwrap();
        info.try_emplace(keys::PIECE_LENGTH, Variant::Int(16_384)).unwrap();
        info.try_emplace(keys::PIECES, Variant::raw_string(vec![0u8; 20])).unwrap();
        info.try_emplace(keys::FILES, Variant::Vector(vec![file_entry])).unwrap();

        let mut top = Variant::new_map();
        top.try_emplace(keys::INFO, info).unwrap();
        let bytes = btcore_bencode::encode(&top);
        assert!(matches!(parse(&bytes), Err(MetainfoError::PathUnsafe { .. })));
    }
}
