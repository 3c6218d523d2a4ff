use btcore_variant::Variant;

/// A type with a registered `Variant <-> T` conversion pair.
///
/// Built-in converters cover the scalar types settings and RPC payloads
/// need; a client registers a user type simply by implementing this trait
/// for it before building a [`crate::Field`] table that mentions it.
pub trait Convert: Sized {
    /// Name used by [`crate::get_value`] to check a field's declared type
    /// before handing back a value.
    const TYPE_NAME: &'static str;

    fn from_variant(value: &Variant<'_>) -> Option<Self>;

    fn to_variant(&self) -> Variant<'static>;

    /// Whether `self` and `other` should be treated as different values by
    /// [`crate::set_if_changed`]. The default is `PartialEq`; floating point
    /// types override this with a relative-epsilon comparison.
    fn changed(&self, other: &Self) -> bool
    where
        Self: PartialEq,
    {
        self != other
    }
}

impl Convert for bool {
    const TYPE_NAME: &'static str = "bool";

    fn from_variant(value: &Variant<'_>) -> Option<Self> {
        value.value_bool()
    }

    fn to_variant(&self) -> Variant<'static> {
        Variant::Bool(*self)
    }
}

impl Convert for i64 {
    const TYPE_NAME: &'static str = "i64";

    fn from_variant(value: &Variant<'_>) -> Option<Self> {
        value.int()
    }

    fn to_variant(&self) -> Variant<'static> {
        Variant::Int(*self)
    }
}

impl Convert for u64 {
    const TYPE_NAME: &'static str = "u64";

    fn from_variant(value: &Variant<'_>) -> Option<Self> {
        value.int().and_then(|n| u64::try_from(n).ok())
    }

    fn to_variant(&self) -> Variant<'static> {
        i64::try_from(*self).map(Variant::Int).unwrap_or(Variant::Double(*self as f64))
    }
}

impl Convert for f64 {
    const TYPE_NAME: &'static str = "f64";

    fn from_variant(value: &Variant<'_>) -> Option<Self> {
        value.value_double()
    }

    fn to_variant(&self) -> Variant<'static> {
        Variant::Double(*self)
    }

    fn changed(&self, other: &Self) -> bool {
        let scale = self.abs().max(other.abs()).max(1.0);
        (self - other).abs() > scale * f64::EPSILON * 8.0
    }
}

impl Convert for String {
    const TYPE_NAME: &'static str = "string";

    fn from_variant(value: &Variant<'_>) -> Option<Self> {
        value.str().map(str::to_owned)
    }

    fn to_variant(&self) -> Variant<'static> {
        Variant::raw_string(self.clone().into_bytes())
    }
}

impl<T: Convert> Convert for Option<T> {
    const TYPE_NAME: &'static str = T::TYPE_NAME;

    fn from_variant(value: &Variant<'_>) -> Option<Self> {
        if value.is_none() {
            Some(None)
        } else {
            T::from_variant(value).map(Some)
        }
    }

    fn to_variant(&self) -> Variant<'static> {
        match self {
            Some(t) => t.to_variant(),
            None => Variant::None,
        }
    }

    fn changed(&self, other: &Self) -> bool
    where
        Self: PartialEq,
    {
        match (self, other) {
            (Some(a), Some(b)) => a.changed(b),
            (None, None) => false,
            _ => true,
        }
    }
}

impl<T: Convert> Convert for Vec<T> {
    const TYPE_NAME: &'static str = "sequence";

    fn from_variant(value: &Variant<'_>) -> Option<Self> {
        value.vector()?.iter().map(T::from_variant).collect()
    }

    fn to_variant(&self) -> Variant<'static> {
        Variant::Vector(self.iter().map(Convert::to_variant).collect())
    }

    fn changed(&self, other: &Self) -> bool
    where
        Self: PartialEq,
    {
        self.len() != other.len() || self.iter().zip(other).any(|(a, b)| a.changed(b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bool_round_trips() {
        assert_eq!(bool::from_variant(&Variant::Bool(true)), Some(true));
        assert_eq!(true.to_variant(), Variant::Bool(true));
    }

    #[test]
    fn option_distinguishes_none_from_absent_coercion_failure() {
        assert_eq!(<Option<i64>>::from_variant(&Variant::None), Some(None));
        assert_eq!(<Option<i64>>::from_variant(&Variant::unmanaged_string(b"nope")), None);
    }

    #[test]
    fn double_changed_uses_relative_epsilon() {
        assert!(!Convert::changed(&1.0_f64, &(1.0 + f64::EPSILON)));
        assert!(Convert::changed(&1.0_f64, &1.1));
    }

    #[test]
    fn vec_round_trips() {
        let v: Vec<i64> = vec![1, 2, 3];
        let variant = v.to_variant();
        assert_eq!(<Vec<i64>>::from_variant(&variant), Some(v));
    }
}
