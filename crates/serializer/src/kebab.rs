use btcore_variant::{VMap, Variant};

/// Rewrites `key` from `kebab-case` to `snake_case` (`-` -> `_`).
#[must_use]
pub fn kebab_to_snake(key: &str) -> String {
    key.replace('-', "_")
}

/// Rewrites `key` from `snake_case` to `kebab-case` (`_` -> `-`).
#[must_use]
pub fn snake_to_kebab(key: &str) -> String {
    key.replace('_', "-")
}

/// Rewrites every map key in `variant`, recursively, from kebab-case to
/// snake_case. Keys that aren't valid UTF-8 are left untouched.
#[must_use]
pub fn tree_kebab_to_snake(variant: &Variant<'_>) -> Variant<'static> {
    rekey(variant, kebab_to_snake)
}

/// Rewrites every map key in `variant`, recursively, from snake_case to
/// kebab-case. Keys that aren't valid UTF-8 are left untouched.
#[must_use]
pub fn tree_snake_to_kebab(variant: &Variant<'_>) -> Variant<'static> {
    rekey(variant, snake_to_kebab)
}

fn rekey(variant: &Variant<'_>, transform: fn(&str) -> String) -> Variant<'static> {
    match variant {
        Variant::None => Variant::None,
        Variant::Null => Variant::Null,
        Variant::Bool(b) => Variant::Bool(*b),
        Variant::Int(i) => Variant::Int(*i),
        Variant::Double(d) => Variant::Double(*d),
        Variant::String(s) => Variant::raw_string(s.as_bytes().to_vec()),
        Variant::Vector(items) => Variant::Vector(items.iter().map(|v| rekey(v, transform)).collect()),
        Variant::Map(map) => {
            let mut out = VMap::new();
            for (key, value) in map.iter() {
                let new_key = match key.as_str() {
                    Some(s) => btcore_quarks::intern(transform(s).as_bytes()).unwrap_or(key),
                    None => key,
                };
                out.insert_or_assign(new_key, rekey(value, transform));
            }
            Variant::Map(out)
        }
    }
}
