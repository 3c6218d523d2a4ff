use std::collections::BTreeMap;
use std::path::Path;

use btcore_bencode::{decode, BDecodeOpts, ParseMode};
use btcore_variant::Variant;
use thiserror::Error;

/// Errors from [`StatsCounters::to_file`]/[`StatsCounters::from_file`].
#[derive(Error, Debug)]
pub enum StatsError {
    #[error("failed to read {path}: {source}")]
    Read { path: String, source: std::io::Error },
    #[error("failed to write {path}: {source}")]
    Write { path: String, source: std::io::Error },
    #[error("{path} does not hold a JSON object of integer counters")]
    MalformedFile { path: String },
}

/// A flat set of named cumulative counters, persisted as `stats.json`.
///
/// [`Self::from_file`] falls back to reading a legacy bencoded `stats.benc`
/// in the same directory when `stats.json` is absent.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StatsCounters {
    counters: BTreeMap<String, u64>,
}

impl StatsCounters {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> u64 {
        self.counters.get(name).copied().unwrap_or(0)
    }

    pub fn set(&mut self, name: &str, value: u64) {
        self.counters.insert(name.to_string(), value);
    }

    pub fn increment(&mut self, name: &str, n: u64) {
        let entry = self.counters.entry(name.to_string()).or_insert(0);
        *entry += n;
    }

    /// Writes these counters as a JSON object to `<dir>/stats.json`.
    ///
    /// # Errors
    ///
    /// Returns [`StatsError::Write`] if the file can't be written.
    pub fn to_file(&self, dir: &Path) -> Result<(), StatsError> {
        let path = dir.join("stats.json");
        let mut map = btcore_variant::VMap::new();
        for (name, value) in &self.counters {
            let key = btcore_quarks::intern(name.as_bytes()).map_err(|_| StatsError::Write {
                path: dir.join("stats.json").display().to_string(),
                source: std::io::Error::new(std::io::ErrorKind::Other, "interner exhausted"),
            })?;
            map.try_emplace(key, Variant::Int(i64::try_from(*value).unwrap_or(i64::MAX)));
        }
        let json = btcore_json::pretty(&Variant::Map(map));
        std::fs::write(&path, json).map_err(|source| StatsError::Write {
            path: path.display().to_string(),
            source,
        })
    }

    /// Reads counters previously written by [`Self::to_file`] from
    /// `<dir>/stats.json`, falling back to a legacy bencoded
    /// `<dir>/stats.benc` when the JSON file is absent.
    ///
    /// # Errors
    ///
    /// Returns [`StatsError::Read`] if neither file can be read, or
    /// [`StatsError::MalformedFile`] if the one found isn't an object/dict
    /// of integers.
    pub fn from_file(dir: &Path) -> Result<Self, StatsError> {
        let json_path = dir.join("stats.json");
        match std::fs::read_to_string(&json_path) {
            Ok(text) => Self::from_json(&text, &json_path.display().to_string()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Self::from_legacy_benc(dir),
            Err(source) => Err(StatsError::Read {
                path: json_path.display().to_string(),
                source,
            }),
        }
    }

    fn from_json(text: &str, path: &str) -> Result<Self, StatsError> {
        let decoded = btcore_json::decode(text, btcore_json::ParseMode::Owned)
            .map_err(|_| StatsError::MalformedFile { path: path.to_string() })?;
        Self::from_map_variant(&decoded, path)
    }

    fn from_legacy_benc(dir: &Path) -> Result<Self, StatsError> {
        let path = dir.join("stats.benc");
        let bytes = std::fs::read(&path).map_err(|source| StatsError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let path_str = path.display().to_string();
        let (decoded, _) = decode(&bytes, BDecodeOpts::default(), ParseMode::Owned)
            .map_err(|_| StatsError::MalformedFile { path: path_str.clone() })?;
        Self::from_map_variant(&decoded, &path_str)
    }

    fn from_map_variant(variant: &Variant<'_>, path: &str) -> Result<Self, StatsError> {
        let map = variant.map().ok_or_else(|| StatsError::MalformedFile { path: path.to_string() })?;
        let mut counters = BTreeMap::new();
        for (key, value) in map.iter() {
            let name = String::from_utf8_lossy(btcore_quarks::resolve(key)).into_owned();
            let value = value.int().ok_or_else(|| StatsError::MalformedFile { path: path.to_string() })?;
            counters.insert(name, value.max(0) as u64);
        }
        Ok(Self { counters })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn increment_accumulates() {
        let mut stats = StatsCounters::new();
        stats.increment("downloads", 3);
        stats.increment("downloads", 4);
        assert_eq!(stats.get("downloads"), 7);
        assert_eq!(stats.get("unset"), 0);
    }

    #[test]
    fn round_trips_through_a_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut stats = StatsCounters::new();
        stats.set("completed", 12);
        stats.set("downloaded", 5);
        stats.to_file(dir.path()).unwrap();

        let reloaded = StatsCounters::from_file(dir.path()).unwrap();
        assert_eq!(reloaded, stats);
    }

    #[test]
    fn falls_back_to_legacy_bencoded_file_when_json_is_absent() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("stats.benc"), b"d9:completedi12ee").unwrap();

        let stats = StatsCounters::from_file(dir.path()).unwrap();
        assert_eq!(stats.get("completed"), 12);
    }
}
