use url::Url;

use crate::error::MetainfoError;
use crate::hash::InfoHash;

/// A parsed `magnet:` URI (BEP-9 `xt=urn:btih:` links).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MagnetLink {
    pub info_hash: InfoHash,
    pub display_name: Option<String>,
    pub trackers: Vec<String>,
    pub webseeds: Vec<String>,
}

/// Parses a `magnet:?xt=urn:btih:<hex>&dn=...&tr=...&ws=...` URI.
///
/// Only the hex-encoded 40-character `btih` form is supported; base32
/// `xt` values are rejected, since nothing in this crate's dependency
/// stack decodes base32.
///
/// # Errors
///
/// Returns [`MetainfoError::ParseFailure`] if the URI isn't a valid `magnet:`
/// URI, has no `xt=urn:btih:` parameter, or the `btih` value isn't a
/// 40-character hex info hash.
pub fn parse_magnet(uri: &str) -> Result<MagnetLink, MetainfoError> {
    let url = Url::parse(uri).map_err(|e| MetainfoError::ParseFailure(e.to_string()))?;
    if url.scheme() != "magnet" {
        return Err(MetainfoError::ParseFailure(format!("not a magnet URI: {uri}")));
    }

    let mut info_hash = None;
    let mut display_name = None;
    let mut trackers = Vec::new();
    let mut webseeds = Vec::new();

    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "xt" => {
                let hex = value
                    .strip_prefix("urn:btih:")
                    .ok_or_else(|| MetainfoError::ParseFailure(format!("unsupported xt value: {value}")))?;
                let parsed: InfoHash = hex
                    .parse()
                    .map_err(|_| MetainfoError::ParseFailure(format!("unsupported btih encoding: {hex}")))?;
                info_hash = Some(parsed);
            }
            "dn" => display_name = Some(value.into_owned()),
            "tr" => trackers.push(value.into_owned()),
            "ws" => webseeds.push(value.into_owned()),
            _ => {}
        }
    }

    let info_hash = info_hash.ok_or_else(|| MetainfoError::ParseFailure("missing xt=urn:btih: parameter".to_string()))?;

    Ok(MagnetLink {
        info_hash,
        display_name,
        trackers,
        webseeds,
    })
}

#[must_use]
pub fn to_magnet_uri(link: &MagnetLink) -> String {
    let mut uri = format!("magnet:?xt=urn:btih:{}", link.info_hash.to_hex_string());
    if let Some(name) = &link.display_name {
        uri.push_str("&dn=");
        uri.push_str(&url::form_urlencoded::byte_serialize(name.as_bytes()).collect::<String>());
    }
    for tracker in &link.trackers {
        uri.push_str("&tr=");
        uri.push_str(&url::form_urlencoded::byte_serialize(tracker.as_bytes()).collect::<String>());
    }
    for webseed in &link.webseeds {
        uri.push_str("&ws=");
        uri.push_str(&url::form_urlencoded::byte_serialize(webseed.as_bytes()).collect::<String>());
    }
    uri
}
