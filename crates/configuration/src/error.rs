use btcore_located_error::{Located, LocatedError};
use thiserror::Error;

/// Errors that can occur while loading or saving configuration.
#[derive(Error, Debug)]
pub enum Error {
    #[error("unable to load configuration: {source}")]
    LoadFailure {
        source: LocatedError<'static, figment::Error>,
    },

    #[error("unable to read or write configuration file: {source}")]
    IoFailure { source: LocatedError<'static, std::io::Error> },

    #[error("unable to encode configuration as TOML: {source}")]
    EncodeFailure {
        source: LocatedError<'static, toml::ser::Error>,
    },
}

impl From<figment::Error> for Error {
    #[track_caller]
    fn from(err: figment::Error) -> Self {
        Self::LoadFailure { source: Located(err).into() }
    }
}

impl From<std::io::Error> for Error {
    #[track_caller]
    fn from(err: std::io::Error) -> Self {
        Self::IoFailure { source: Located(err).into() }
    }
}

impl From<toml::ser::Error> for Error {
    #[track_caller]
    fn from(err: toml::ser::Error) -> Self {
        Self::EncodeFailure { source: Located(err).into() }
    }
}
