use btcore_quarks::Quark;

use crate::entry::{derive_scrape, parse_and_validate, AnnounceEntry};
use crate::error::AnnounceListError;

/// A BEP-12 tiered list of tracker URLs, kept sorted by `(tier, announce)`.
#[derive(Clone, Debug, Default)]
pub struct AnnounceList {
    entries: Vec<AnnounceEntry>,
    next_id: u32,
}

impl AnnounceList {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 1,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AnnounceEntry> {
        self.entries.iter()
    }

    /// `0` for an empty list, else one past the highest tier present.
    #[must_use]
    pub fn next_tier(&self) -> u32 {
        self.entries.last().map_or(0, |e| e.tier + 1)
    }

    fn find_duplicate(&self, key: &crate::entry::UrlKey) -> bool {
        self.entries.iter().any(|e| &e.key == key)
    }

    fn sibling_tier(&self, key: &crate::entry::UrlKey) -> Option<u32> {
        self.entries.iter().find(|e| e.shares_host_and_path(key) && e.key.scheme != key.scheme).map(|e| e.tier)
    }

    /// Validates and adds `url`, returning its fresh id.
    ///
    /// The new entry's tier is [`Self::next_tier`], unless another entry
    /// already in the list shares its `(host, path)` under a different
    /// scheme, in which case it joins that entry's tier instead.
    ///
    /// # Errors
    ///
    /// Returns [`AnnounceListError::InvalidUrl`] if `url` doesn't parse or
    /// uses a non-tracker scheme, or [`AnnounceListError::DuplicateUrl`] if
    /// an equivalent entry is already present. The list is left unchanged
    /// on either error.
    pub fn add(&mut self, url: &str) -> Result<u32, AnnounceListError> {
        let tier = self.sibling_tier(&parse_and_validate(url)?.1).unwrap_or_else(|| self.next_tier());
        self.add_in_tier(url, tier)
    }

    /// Like [`Self::add`], but forces the entry into `tier` instead of
    /// deriving one.
    ///
    /// # Errors
    ///
    /// See [`Self::add`].
    pub fn add_in_tier(&mut self, url: &str, tier: u32) -> Result<u32, AnnounceListError> {
        let (parsed, key) = parse_and_validate(url)?;
        if self.find_duplicate(&key) {
            return Err(AnnounceListError::DuplicateUrl { url: url.to_string() });
        }

        let id = self.next_id;
        self.next_id += 1;

        let announce = Quark::from_str(parsed.as_str()).map_err(|_| AnnounceListError::InvalidUrl { url: url.to_string() })?;
        let scrape_str = derive_scrape(&parsed);
        let scrape = if scrape_str.is_empty() {
            Quark::from_str("").map_err(|_| AnnounceListError::InvalidUrl { url: url.to_string() })?
        } else {
            Quark::from_str(&scrape_str).map_err(|_| AnnounceListError::InvalidUrl { url: url.to_string() })?
        };

        let entry = AnnounceEntry {
            id,
            tier,
            announce,
            scrape,
            key,
        };

        let pos = self
            .entries
            .binary_search_by(|e| (e.tier, e.announce()).cmp(&(entry.tier, entry.announce())))
            .unwrap_or_else(|p| p);
        self.entries.insert(pos, entry);
        Ok(id)
    }

    /// Replaces the URL of the entry with id `id`, preserving its tier.
    ///
    /// # Errors
    ///
    /// Returns [`AnnounceListError::UnknownId`] if no entry has this id,
    /// or the errors of [`Self::add_in_tier`] if `new_url` is invalid or a
    /// duplicate of a *different* entry.
    pub fn replace(&mut self, id: u32, new_url: &str) -> Result<(), AnnounceListError> {
        let index = self.entries.iter().position(|e| e.id == id).ok_or(AnnounceListError::UnknownId { id })?;
        let tier = self.entries[index].tier;

        let (parsed, key) = parse_and_validate(new_url)?;
        if self.entries.iter().enumerate().any(|(i, e)| i != index && e.key == key) {
            return Err(AnnounceListError::DuplicateUrl { url: new_url.to_string() });
        }

        let announce =
            Quark::from_str(parsed.as_str()).map_err(|_| AnnounceListError::InvalidUrl { url: new_url.to_string() })?;
        let scrape_str = derive_scrape(&parsed);
        let scrape =
            Quark::from_str(&scrape_str).map_err(|_| AnnounceListError::InvalidUrl { url: new_url.to_string() })?;

        self.entries.remove(index);
        let entry = AnnounceEntry {
            id,
            tier,
            announce,
            scrape,
            key,
        };
        let pos = self
            .entries
            .binary_search_by(|e| (e.tier, e.announce()).cmp(&(entry.tier, entry.announce())))
            .unwrap_or_else(|p| p);
        self.entries.insert(pos, entry);
        Ok(())
    }
}
