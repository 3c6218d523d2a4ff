use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnnounceListError {
    #[error("{url:?} is not a valid tracker URL")]
    InvalidUrl { url: String },
    #[error("{url:?} duplicates an entry already in the list")]
    DuplicateUrl { url: String },
    #[error("no entry with id {id}")]
    UnknownId { id: u32 },
}
