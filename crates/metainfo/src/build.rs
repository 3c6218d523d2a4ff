use std::io::Read;

use btcore_announce_list::AnnounceList;
use camino::{Utf8Path, Utf8PathBuf};
use sha1::{Digest, Sha1};

use crate::error::MetainfoError;
use crate::hash::InfoHash;
use crate::path::sanitize_subpath;
use crate::serialize::info_dict_variant;
use crate::types::{FileEntry, Metainfo};

/// Optional metadata for [`build_from_path`]; everything defaults to
/// absent/false.
#[derive(Default, Debug, Clone)]
pub struct BuildOptions {
    pub comment: Option<String>,
    pub source: Option<String>,
    pub is_private: bool,
    pub webseeds: Vec<String>,
    pub announce_list: AnnounceList,
    /// When set, `creator`/`date_created` are omitted from the result
    /// entirely instead of being filled in from the environment.
    pub anonymize: bool,
}

fn walk_files(root: &Utf8Path) -> Result<Vec<Utf8PathBuf>, MetainfoError> {
    let mut out = Vec::new();
    let mut stack = vec![root.to_path_buf()];
    while let Some(dir) = stack.pop() {
        for entry in dir.read_dir_utf8()? {
            let entry = entry?;
            let path = entry.path().to_path_buf();
            if entry.file_type()?.is_dir() {
                stack.push(path);
            } else {
                out.push(path);
            }
        }
    }
    out.sort();
    Ok(out)
}

/// Builds a [`Metainfo`] from a file or a directory tree at `root`, hashing
/// file contents into fixed-size pieces in sorted-path order.
///
/// # Errors
///
/// Returns [`MetainfoError::IoFailure`] if a file can't be read, or
/// [`MetainfoError::PathUnsafe`] if a discovered file's relative path fails
/// portable-subpath validation.
pub fn build_from_path(root: &Utf8Path, piece_size: u64, options: &BuildOptions) -> Result<Metainfo, MetainfoError> {
    let metadata = std::fs::metadata(root)?;
    let name = root
        .file_name()
        .ok_or_else(|| MetainfoError::PathUnsafe { path: root.to_string() })?
        .to_string();

    let (files, abs_paths): (Vec<FileEntry>, Vec<Utf8PathBuf>) = if metadata.is_dir() {
        let discovered = walk_files(root)?;
        let mut files = Vec::with_capacity(discovered.len());
        for abs in &discovered {
            let relative = abs
                .strip_prefix(root)
                .map_err(|_| MetainfoError::PathUnsafe { path: abs.to_string() })?;
            let components: Vec<String> = relative.components().map(|c| c.as_str().to_string()).collect();
            let sanitized = sanitize_subpath(&components)?;
            let length = std::fs::metadata(abs)?.len();
            files.push(FileEntry {
                path: sanitized,
                length,
                md5sum: None,
            });
        }
        (files, discovered)
    } else {
        let sanitized = sanitize_subpath(&[name.clone()])?;
        (
            vec![FileEntry {
                path: sanitized,
                length: metadata.len(),
                md5sum: None,
            }],
            vec![root.to_path_buf()],
        )
    };

    let piece_hashes = hash_pieces(&abs_paths, piece_size)?;

    let info = info_dict_variant(&name, piece_size, &piece_hashes, &files, options.is_private, options.source.as_deref());
    let info_hash = InfoHash::of(&btcore_bencode::encode(&info));

    Ok(Metainfo {
        name,
        comment: options.comment.clone(),
        source: options.source.clone(),
        creator: if options.anonymize { None } else { Some(env!("CARGO_PKG_NAME").to_string()) },
        date_created: None,
        is_private: options.is_private,
        info_hash,
        piece_size,
        piece_hashes,
        files,
        webseeds: options.webseeds.clone(),
        announce_list: options.announce_list.clone(),
    })
}

fn hash_pieces(files: &[Utf8PathBuf], piece_size: u64) -> Result<Vec<[u8; 20]>, MetainfoError> {
    let piece_size = piece_size as usize;
    let mut hashes = Vec::new();
    let mut buffer = Vec::with_capacity(piece_size);
    let mut chunk = vec![0u8; 64 * 1024];

    for path in files {
        let mut file = std::fs::File::open(path)?;
        loop {
            let read = file.read(&mut chunk)?;
            if read == 0 {
                break;
            }
            buffer.extend_from_slice(&chunk[..read]);
            while buffer.len() >= piece_size {
                let piece: Vec<u8> = buffer.drain(..piece_size).collect();
                hashes.push(hash_one(&piece));
            }
        }
    }
    if !buffer.is_empty() {
        hashes.push(hash_one(&buffer));
    }
    Ok(hashes)
}

fn hash_one(bytes: &[u8]) -> [u8; 20] {
    let mut hasher = Sha1::new();
    hasher.update(bytes);
    let digest = hasher.finalize();
    let mut out = [0u8; 20];
    out.copy_from_slice(&digest);
    out
}
