//! Layered configuration for crate-level tunables.
//!
//! [`Limits`] holds the handful of values that are genuinely configuration
//! rather than protocol constants: the bencode/JSON string-length and
//! recursion caps, the BEP-9 metadata-transfer piece-request quiet period,
//! and the window a recent-activity counter is queried over.
//!
//! [`Settings::load`] layers three sources, in increasing priority: the
//! [`Default`] values, an optional TOML file, and an optional environment
//! variable carrying a whole TOML document (`TORRUST_CONFIG_OVERRIDE`). This
//! mirrors how a larger tracker/session binary built on this crate would
//! load its own configuration, but it is not required for in-process use of
//! the core types: callers that just want [`Limits::default`] never need to
//! touch this module.

mod error;
mod limits;

use std::path::Path;

use figment::providers::{Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

pub use error::Error;
pub use limits::{fields, Limits};

const CONFIG_OVERRIDE_ENV_VAR: &str = "TORRUST_CONFIG_OVERRIDE";

/// Top-level configuration document.
#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone, Copy, Default)]
pub struct Settings {
    pub limits: Limits,
}

impl Settings {
    /// Loads settings layering defaults, an optional TOML file at `path`,
    /// and an optional `TORRUST_CONFIG_OVERRIDE` environment variable
    /// carrying a whole TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LoadFailure`] if the file (when present) or the
    /// override environment variable isn't valid TOML, or doesn't match
    /// [`Settings`]'s shape.
    pub fn load(path: &Path) -> Result<Self, Error> {
        let mut figment = Figment::from(Serialized::defaults(Settings::default()));
        if path.exists() {
            figment = figment.merge(Toml::file(path));
        }
        if let Ok(toml_doc) = std::env::var(CONFIG_OVERRIDE_ENV_VAR) {
            figment = figment.merge(Toml::string(&toml_doc));
        }
        Ok(figment.extract()?)
    }

    /// Writes these settings to `path` as TOML.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EncodeFailure`] if the settings can't be serialized,
    /// or [`Error::IoFailure`] if `path` can't be written.
    pub fn save_to_file(&self, path: &Path) -> Result<(), Error> {
        let toml_doc = toml::to_string(self)?;
        std::fs::write(path, toml_doc)?;
        Ok(())
    }
}
