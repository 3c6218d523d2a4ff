use std::collections::HashMap;

use btcore_quarks::Quark;

use crate::Variant;

/// An insertion-ordered map from [`Quark`] to [`Variant`], with unique keys.
///
/// Iteration order is insertion order; [`VMap::sorted_entries`] gives the
/// byte-sorted-by-key order codecs must serialize in.
#[derive(Clone, Debug, Default)]
pub struct VMap<'a> {
    entries: Vec<(Quark, Variant<'a>)>,
    index: HashMap<Quark, usize>,
}

impl<'a> VMap<'a> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
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

    #[must_use]
    pub fn find(&self, key: Quark) -> Option<&Variant<'a>> {
        self.index.get(&key).map(|&i| &self.entries[i].1)
    }

    #[must_use]
    pub fn find_mut(&mut self, key: Quark) -> Option<&mut Variant<'a>> {
        match self.index.get(&key) {
            Some(&i) => Some(&mut self.entries[i].1),
            None => None,
        }
    }

    #[must_use]
    pub fn contains(&self, key: Quark) -> bool {
        self.index.contains_key(&key)
    }

    /// Inserts `key => value` only if `key` is absent; returns a reference to
    /// whichever entry ends up stored (the new one, or the pre-existing one
    /// if `key` was already present).
    pub fn try_emplace(&mut self, key: Quark, value: Variant<'a>) -> &mut Variant<'a> {
        let index = *self.index.entry(key).or_insert_with(|| {
            self.entries.push((key, value));
            self.entries.len() - 1
        });
        &mut self.entries[index].1
    }

    /// Inserts `key => value`, replacing any existing value for `key` in
    /// place (preserving its original position) and returning the old value.
    pub fn insert_or_assign(&mut self, key: Quark, value: Variant<'a>) -> Option<Variant<'a>> {
        if let Some(&i) = self.index.get(&key) {
            Some(std::mem::replace(&mut self.entries[i].1, value))
        } else {
            self.index.insert(key, self.entries.len());
            self.entries.push((key, value));
            None
        }
    }

    /// Removes `key`, shifting later entries down by one to preserve
    /// insertion order among the survivors.
    pub fn erase(&mut self, key: Quark) -> Option<Variant<'a>> {
        let i = self.index.remove(&key)?;
        let (_, value) = self.entries.remove(i);
        for idx in self.index.values_mut() {
            if *idx > i {
                *idx -= 1;
            }
        }
        Some(value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Quark, &Variant<'a>)> {
        self.entries.iter().map(|(k, v)| (*k, v))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Quark, &mut Variant<'a>)> {
        self.entries.iter_mut().map(|(k, v)| (*k, &mut *v))
    }

    /// Entries sorted by the byte order of each key's interned string, for
    /// deterministic serialization.
    #[must_use]
    pub fn sorted_entries(&self) -> Vec<(Quark, &Variant<'a>)> {
        let mut out: Vec<(Quark, &Variant<'a>)> = self.entries.iter().map(|(k, v)| (*k, v)).collect();
        out.sort_by(|(a, _), (b, _)| a.as_bytes().cmp(b.as_bytes()));
        out
    }
}

impl<'a> FromIterator<(Quark, Variant<'a>)> for VMap<'a> {
    fn from_iter<I: IntoIterator<Item = (Quark, Variant<'a>)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (k, v) in iter {
            map.insert_or_assign(k, v);
        }
        map
    }
}

impl<'a> IntoIterator for VMap<'a> {
    type Item = (Quark, Variant<'a>);
    type IntoIter = std::vec::IntoIter<(Quark, Variant<'a>)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
