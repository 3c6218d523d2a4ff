use btcore_quarks::Quark;
use url::Url;

use crate::error::AnnounceListError;

const ALLOWED_SCHEMES: &[&str] = &["http", "https", "udp", "ws"];

/// The cached, comparable components of a tracker URL: everything but the
/// fragment, since two trackers that differ only by fragment are the same
/// endpoint.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct UrlKey {
    pub scheme: String,
    pub host: String,
    pub port: Option<u16>,
    pub path: String,
    pub query: Option<String>,
}

impl UrlKey {
    fn host_path(&self) -> (&str, &str) {
        (&self.host, &self.path)
    }
}

pub(crate) fn parse_and_validate(raw: &str) -> Result<(Url, UrlKey), AnnounceListError> {
    let trimmed = raw.trim();
    let url = Url::parse(trimmed).map_err(|_| AnnounceListError::InvalidUrl { url: raw.to_string() })?;

    if !ALLOWED_SCHEMES.contains(&url.scheme()) {
        return Err(AnnounceListError::InvalidUrl { url: raw.to_string() });
    }
    let Some(host) = url.host_str() else {
        return Err(AnnounceListError::InvalidUrl { url: raw.to_string() });
    };

    let key = UrlKey {
        scheme: url.scheme().to_string(),
        host: host.to_string(),
        port: url.port_or_known_default(),
        path: url.path().to_string(),
        query: url.query().map(str::to_string),
    };
    Ok((url, key))
}

/// One tracker in an [`crate::AnnounceList`].
#[derive(Clone, Debug)]
pub struct AnnounceEntry {
    pub(crate) id: u32,
    pub(crate) tier: u32,
    pub(crate) announce: Quark,
    pub(crate) scrape: Quark,
    pub(crate) key: UrlKey,
}

impl AnnounceEntry {
    #[must_use]
    pub fn id(&self) -> u32 {
        self.id
    }

    #[must_use]
    pub fn tier(&self) -> u32 {
        self.tier
    }

    #[must_use]
    pub fn announce(&self) -> &str {
        self.announce.as_str().unwrap_or_default()
    }

    #[must_use]
    pub fn scrape(&self) -> &str {
        self.scrape.as_str().unwrap_or_default()
    }

    pub(crate) fn shares_host_and_path(&self, other: &UrlKey) -> bool {
        self.key.host_path() == other.host_path()
    }
}

/// Derives the scrape URL for an announce URL per BEP-23/UDP tracker
/// convention: an `announce` final path segment becomes `scrape`; a `udp`
/// scheme's announce URL doubles as its scrape URL; otherwise there is none.
#[must_use]
pub(crate) fn derive_scrape(url: &Url) -> String {
    if url.scheme() == "udp" {
        return url.as_str().to_string();
    }
    let segments: Vec<&str> = url.path_segments().map(Iterator::collect).unwrap_or_default();
    if segments.last() == Some(&"announce") {
        let mut scraped = url.clone();
        {
            let mut seg = scraped.path_segments_mut().expect("tracker schemes are never cannot-be-a-base");
            seg.pop();
            seg.push("scrape");
        }
        scraped.as_str().to_string()
    } else {
        String::new()
    }
}
