use crate::error::AnnounceListError;
use crate::list::AnnounceList;

/// Parses the line-oriented announce-list text format: one tracker URL per
/// line, tiers separated by one or more blank lines, leading/trailing blank
/// lines ignored.
///
/// The whole input is validated before anything is added: a single invalid
/// or duplicate URL leaves the returned list absent rather than partially
/// built.
///
/// # Errors
///
/// Returns the first [`AnnounceListError`] encountered, in line order.
pub fn parse_from_text(text: &str) -> Result<AnnounceList, AnnounceListError> {
    let mut list = AnnounceList::new();
    let mut tier: u32 = 0;
    let mut tier_has_entries = false;

    for raw_line in text.lines() {
        let line = raw_line.trim();
        if line.is_empty() {
            if tier_has_entries {
                tier += 1;
                tier_has_entries = false;
            }
            continue;
        }
        list.add_in_tier(line, tier)?;
        tier_has_entries = true;
    }

    Ok(list)
}

/// Serializes `list` back to the line-oriented text format: one URL per
/// line, tiers separated by a blank line, with a trailing newline.
#[must_use]
pub fn serialize_to_text(list: &AnnounceList) -> String {
    let mut out = String::new();
    let mut current_tier: Option<u32> = None;

    for entry in list.iter() {
        if let Some(prev) = current_tier {
            if prev != entry.tier() {
                out.push('\n');
            }
        }
        current_tier = Some(entry.tier());
        out.push_str(entry.announce());
        out.push('\n');
    }

    out
}
