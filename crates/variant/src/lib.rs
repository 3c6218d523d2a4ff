//! The [`Variant`] tagged union: the single value type the bencode and JSON
//! codecs decode into and encode from, and that the serializer field tables
//! and announce-list/metainfo models build and inspect.
//!
//! A variant is move-only and owns nothing shared; the only way to get a
//! deep copy of one is [`Variant::merge`] into another owned variant.

mod error;
mod map;
mod string;
mod walk;

pub use error::VariantError;
pub use map::VMap;
pub use string::VString;
pub use walk::{walk, Visitor};

/// A dynamically-typed value with eight cases: absent, explicit null, bool,
/// signed 64-bit int, binary64 double, string, ordered vector, and an
/// insertion-ordered map keyed by [`btcore_quarks::Quark`].
#[derive(Clone, Debug)]
pub enum Variant<'a> {
    /// Absent / "not set" -- the default value.
    None,
    /// An explicit JSON `null`, distinct from being unset.
    Null,
    Bool(bool),
    Int(i64),
    Double(f64),
    String(VString<'a>),
    Vector(Vec<Variant<'a>>),
    Map(VMap<'a>),
}

impl Default for Variant<'_> {
    fn default() -> Self {
        Self::None
    }
}

impl PartialEq for Variant<'_> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::None, Self::None) | (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Double(a), Self::Double(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Vector(a), Self::Vector(b)) => a == b,
            (Self::Map(a), Self::Map(b)) => a.sorted_entries() == b.sorted_entries(),
            _ => false,
        }
    }
}

impl<'a> Variant<'a> {
    #[must_use]
    pub fn new_map() -> Self {
        Self::Map(VMap::new())
    }

    #[must_use]
    pub fn new_vector() -> Self {
        Self::Vector(Vec::new())
    }

    /// A string variant that copies `bytes` into owned storage.
    #[must_use]
    pub fn raw_string(bytes: impl Into<Box<[u8]>>) -> Self {
        Self::String(VString::owned(bytes))
    }

    /// A string variant that borrows `bytes`; `bytes` must outlive the
    /// returned variant.
    #[must_use]
    pub fn unmanaged_string(bytes: &'a [u8]) -> Self {
        Self::String(VString::unmanaged(bytes))
    }

    #[must_use]
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    #[must_use]
    pub fn bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[must_use]
    pub fn int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    #[must_use]
    pub fn double(&self) -> Option<f64> {
        match self {
            Self::Double(d) => Some(*d),
            _ => None,
        }
    }

    /// The byte view of a string variant, regardless of whether it owns its
    /// storage or borrows it.
    #[must_use]
    pub fn bytes(&self) -> Option<&[u8]> {
        match self {
            Self::String(s) => Some(s.as_bytes()),
            _ => None,
        }
    }

    #[must_use]
    pub fn str(&self) -> Option<&str> {
        self.bytes().and_then(|b| std::str::from_utf8(b).ok())
    }

    #[must_use]
    pub fn vector(&self) -> Option<&[Variant<'a>]> {
        match self {
            Self::Vector(v) => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub fn vector_mut(&mut self) -> Option<&mut Vec<Variant<'a>>> {
        match self {
            Self::Vector(v) => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub fn map(&self) -> Option<&VMap<'a>> {
        match self {
            Self::Map(m) => Some(m),
            _ => None,
        }
    }

    #[must_use]
    pub fn map_mut(&mut self) -> Option<&mut VMap<'a>> {
        match self {
            Self::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Reads this variant as a bool, applying the coercion rules: an int
    /// of exactly 0 or 1, or the literal strings `"true"`/`"false"`.
    #[must_use]
    pub fn value_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            Self::Int(0) => Some(false),
            Self::Int(1) => Some(true),
            Self::String(s) => match s.as_bytes() {
                b"true" => Some(true),
                b"false" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }

    /// Reads this variant as a double: doubles pass through, ints always
    /// convert, and strings convert iff they parse as a finite number.
    #[must_use]
    pub fn value_double(&self) -> Option<f64> {
        match self {
            Self::Double(d) => Some(*d),
            Self::Int(i) => Some(*i as f64),
            Self::String(s) => std::str::from_utf8(s.as_bytes())
                .ok()
                .and_then(|s| s.parse::<f64>().ok())
                .filter(|d| d.is_finite()),
            _ => None,
        }
    }

    /// Appends `value` to this vector.
    ///
    /// # Errors
    ///
    /// Returns [`VariantError::TypeMismatch`] if this variant is not a
    /// `Vector`.
    pub fn push(&mut self, value: Variant<'a>) -> Result<(), VariantError> {
        self.vector_mut()
            .ok_or(VariantError::TypeMismatch { expected: "vector" })?
            .push(value);
        Ok(())
    }

    /// Inserts `key => value` into this map iff `key` is absent.
    ///
    /// # Errors
    ///
    /// Returns [`VariantError::TypeMismatch`] if this variant is not a
    /// `Map`.
    pub fn try_emplace(
        &mut self,
        key: btcore_quarks::Quark,
        value: Variant<'a>,
    ) -> Result<&mut Variant<'a>, VariantError> {
        Ok(self
            .map_mut()
            .ok_or(VariantError::TypeMismatch { expected: "map" })?
            .try_emplace(key, value))
    }

    /// Inserts `key => value` into this map, replacing any prior value.
    ///
    /// # Errors
    ///
    /// Returns [`VariantError::TypeMismatch`] if this variant is not a
    /// `Map`.
    pub fn insert_or_assign(
        &mut self,
        key: btcore_quarks::Quark,
        value: Variant<'a>,
    ) -> Result<Option<Variant<'a>>, VariantError> {
        Ok(self
            .map_mut()
            .ok_or(VariantError::TypeMismatch { expected: "map" })?
            .insert_or_assign(key, value))
    }

    /// Removes `key` from this map.
    ///
    /// # Errors
    ///
    /// Returns [`VariantError::TypeMismatch`] if this variant is not a
    /// `Map`.
    pub fn erase(&mut self, key: btcore_quarks::Quark) -> Result<Option<Variant<'a>>, VariantError> {
        Ok(self
            .map_mut()
            .ok_or(VariantError::TypeMismatch { expected: "map" })?
            .erase(key))
    }

    /// Looks up `key` in this map; `None` if this isn't a map or the key is
    /// absent.
    #[must_use]
    pub fn find(&self, key: btcore_quarks::Quark) -> Option<&Variant<'a>> {
        self.map()?.find(key)
    }

    /// Visits this variant depth-first; see [`walk`].
    pub fn walk(&self, visitor: &mut dyn Visitor) {
        walk::walk(self, visitor);
    }

    /// Merges `src` into `self`.
    ///
    /// Scalars (and mismatched-kind pairs) are overwritten wholesale.
    /// Vectors merge element-wise up to `min(len)`, then `self` gains
    /// whichever tail is longer. Maps recursively merge values sharing a
    /// key and otherwise take the union of both maps' entries.
    pub fn merge(&mut self, src: Variant<'a>) {
        match (&mut *self, src) {
            (Self::Vector(dst), Self::Vector(mut src)) => {
                let shared = dst.len().min(src.len());
                for (d, s) in dst.iter_mut().zip(src.drain(..shared)) {
                    d.merge(s);
                }
                dst.extend(src);
            }
            (Self::Map(dst), Self::Map(src)) => {
                for (key, value) in src {
                    match dst.find_mut(key) {
                        Some(existing) => existing.merge(value),
                        None => {
                            dst.insert_or_assign(key, value);
                        }
                    }
                }
            }
            (dst, src) => *dst = src,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use btcore_quarks::keys;

    #[test]
    fn value_bool_coerces_ints_and_strings() {
        assert_eq!(Variant::Int(0).value_bool(), Some(false));
        assert_eq!(Variant::Int(1).value_bool(), Some(true));
        assert_eq!(Variant::Int(2).value_bool(), None);
        assert_eq!(Variant::unmanaged_string(b"true").value_bool(), Some(true));
        assert_eq!(Variant::unmanaged_string(b"nope").value_bool(), None);
    }

    #[test]
    fn value_double_coerces_ints_and_finite_strings() {
        assert_eq!(Variant::Int(4).value_double(), Some(4.0));
        assert_eq!(Variant::unmanaged_string(b"3.5").value_double(), Some(3.5));
        assert_eq!(Variant::unmanaged_string(b"not-a-number").value_double(), None);
        assert_eq!(Variant::unmanaged_string(b"inf").value_double(), None);
    }

    #[test]
    fn push_requires_a_vector() {
        let mut scalar = Variant::Int(1);
        assert_eq!(
            scalar.push(Variant::Int(2)),
            Err(VariantError::TypeMismatch { expected: "vector" })
        );

        let mut vector = Variant::new_vector();
        vector.push(Variant::Int(1)).unwrap();
        assert_eq!(vector.vector().unwrap().len(), 1);
    }

    #[test]
    fn try_emplace_keeps_first_value_on_conflict() {
        let mut map = Variant::new_map();
        map.try_emplace(keys::NAME, Variant::Int(1)).unwrap();
        map.try_emplace(keys::NAME, Variant::Int(2)).unwrap();
        assert_eq!(map.find(keys::NAME), Some(&Variant::Int(1)));
    }

    #[test]
    fn merge_overwrites_scalars() {
        let mut a = Variant::Int(1);
        a.merge(Variant::Int(2));
        assert_eq!(a, Variant::Int(2));
    }

    #[test]
    fn merge_vectors_element_wise_then_appends_tail() {
        let mut a = Variant::Vector(vec![Variant::Int(1), Variant::Int(2)]);
        let b = Variant::Vector(vec![Variant::Int(10), Variant::Int(20), Variant::Int(30)]);
        a.merge(b);
        assert_eq!(
            a,
            Variant::Vector(vec![Variant::Int(10), Variant::Int(20), Variant::Int(30)])
        );
    }

    #[test]
    fn merge_maps_recursively_by_key() {
        let mut a = Variant::new_map();
        a.try_emplace(keys::NAME, Variant::unmanaged_string(b"old")).unwrap();
        a.try_emplace(keys::SOURCE, Variant::unmanaged_string(b"keep")).unwrap();

        let mut b = Variant::new_map();
        b.try_emplace(keys::NAME, Variant::unmanaged_string(b"new")).unwrap();
        b.try_emplace(keys::COMMENT, Variant::unmanaged_string(b"added")).unwrap();

        a.merge(b);

        assert_eq!(a.find(keys::NAME), Some(&Variant::unmanaged_string(b"new")));
        assert_eq!(a.find(keys::SOURCE), Some(&Variant::unmanaged_string(b"keep")));
        assert_eq!(a.find(keys::COMMENT), Some(&Variant::unmanaged_string(b"added")));
    }

    #[test]
    fn walk_on_unset_variant_emits_empty() {
        struct Counter(usize);
        impl Visitor for Counter {
            fn empty(&mut self) {
                self.0 += 1;
            }
        }
        let mut counter = Counter(0);
        Variant::None.walk(&mut counter);
        assert_eq!(counter.0, 1);
    }
}
