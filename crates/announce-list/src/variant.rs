use btcore_quarks::keys;
use btcore_variant::Variant;

use crate::list::AnnounceList;

/// Builds the `announce`/`announce-list` entries of a `.torrent` dictionary
/// for `list`.
///
/// The first tracker (by `(tier, announce)` order) is always written under
/// `announce`. `announce-list` — a list of tiers, each a list of URLs — is
/// written only when more than one tracker is present, matching what real
/// `.torrent` files do: single-tracker torrents never carry the BEP-12
/// extension.
#[must_use]
pub fn to_entries(list: &AnnounceList) -> Vec<(btcore_quarks::Quark, Variant<'static>)> {
    let mut entries = Vec::new();

    let Some(first) = list.iter().next() else {
        return entries;
    };
    entries.push((keys::ANNOUNCE, Variant::raw_string(first.announce().as_bytes().to_vec())));

    if list.len() < 2 {
        return entries;
    }

    let mut tiers: Vec<Vec<Variant<'static>>> = Vec::new();
    let mut current_tier = None;
    for entry in list.iter() {
        if current_tier != Some(entry.tier()) {
            tiers.push(Vec::new());
            current_tier = Some(entry.tier());
        }
        tiers
            .last_mut()
            .expect("a tier was just pushed")
            .push(Variant::raw_string(entry.announce().as_bytes().to_vec()));
    }
    let tier_list = tiers.into_iter().map(Variant::Vector).collect();
    entries.push((keys::ANNOUNCE_LIST, Variant::Vector(tier_list)));

    entries
}

/// Rebuilds an [`AnnounceList`] from a `.torrent`-style dictionary's
/// `announce`/`announce-list` entries.
///
/// `announce-list`, when present, is authoritative for tiering;
/// `announce` only contributes a tracker when it isn't already covered by
/// `announce-list` (the common case of older torrents that carry only
/// `announce`).
#[must_use]
pub fn from_variant(announce: Option<&str>, announce_list: Option<&Variant<'_>>) -> AnnounceList {
    let mut list = AnnounceList::new();

    if let Some(outer) = announce_list.and_then(Variant::vector) {
        for (tier, tier_value) in outer.iter().enumerate() {
            let Some(urls) = tier_value.vector() else {
                continue;
            };
            for url in urls {
                if let Some(s) = url.str() {
                    let _ = list.add_in_tier(s, tier as u32);
                }
            }
        }
    }

    if list.is_empty() {
        if let Some(url) = announce {
            let _ = list.add(url);
        }
    }

    list
}
