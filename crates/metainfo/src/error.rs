use thiserror::Error;

#[derive(Error, Debug)]
pub enum MetainfoError {
    #[error("failed to parse torrent bytes: {0}")]
    ParseFailure(String),
    #[error("path {path:?} is not a portable relative path")]
    PathUnsafe { path: String },
    #[error("expected info_hash {expected} but assembled bytes hash to {actual}")]
    HashMismatch { expected: String, actual: String },
    #[error("I/O failure: {0}")]
    IoFailure(#[from] std::io::Error),
}
