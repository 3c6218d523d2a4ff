//! Parsing, building, and transferring BitTorrent `.torrent` metainfo and
//! magnet links.

mod build;
mod error;
mod hash;
mod magnet;
mod parse;
mod path;
mod serialize;
mod transfer;
mod types;

pub use build::{build_from_path, BuildOptions};
pub use error::MetainfoError;
pub use hash::{InfoHash, InfoHashParseError, INFO_HASH_BYTES_LEN};
pub use magnet::{parse_magnet, to_magnet_uri, MagnetLink};
pub use parse::parse;
pub use path::{is_portable, sanitize_subpath};
pub use serialize::{encode, to_variant};
pub use transfer::{KnownOuterFields, MetadataTransfer, METADATA_PIECE_SIZE};
pub use types::{FileEntry, Metainfo};
