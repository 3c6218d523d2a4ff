use btcore_quarks::Quark;
use btcore_variant::{VMap, Variant};

use crate::convert::Convert;

/// One named, typed member of `S`, built from a pair of accessor functions.
///
/// There is no derive macro here: a type lists its fields as a
/// `&[Field<Self>]` built with [`Field::new`], one per member that should
/// round-trip through a [`Variant`] map.
pub struct Field<S> {
    key: Quark,
    type_name: &'static str,
    save: Box<dyn Fn(&S, &mut VMap<'static>)>,
    load: Box<dyn Fn(&mut S, &VMap<'_>) -> bool>,
    set_if_changed: Box<dyn Fn(&mut S, &Variant<'_>) -> bool>,
    get_value: Box<dyn Fn(&S) -> Variant<'static>>,
}

impl<S> Field<S> {
    pub fn new<T>(key: Quark, get: fn(&S) -> &T, get_mut: fn(&mut S) -> &mut T) -> Self
    where
        T: Convert + PartialEq + 'static,
    {
        Field {
            key,
            type_name: T::TYPE_NAME,
            save: Box::new(move |s, map| {
                map.insert_or_assign(key, get(s).to_variant());
            }),
            load: Box::new(move |s, map| match map.find(key).and_then(T::from_variant) {
                Some(value) => {
                    *get_mut(s) = value;
                    true
                }
                None => false,
            }),
            set_if_changed: Box::new(move |s, value| match T::from_variant(value) {
                Some(new_value) => {
                    let slot = get_mut(s);
                    if Convert::changed(&*slot, &new_value) {
                        *slot = new_value;
                        true
                    } else {
                        false
                    }
                }
                None => false,
            }),
            get_value: Box::new(move |s| get(s).to_variant()),
        }
    }

    #[must_use]
    pub fn key(&self) -> Quark {
        self.key
    }
}

/// Writes every field of `value` into a fresh map.
#[must_use]
pub fn save<S>(value: &S, fields: &[Field<S>]) -> VMap<'static> {
    let mut map = VMap::new();
    for field in fields {
        (field.save)(value, &mut map);
    }
    map
}

/// Reads every key present in `source` into `value`, leaving fields whose
/// key is absent or whose value doesn't convert untouched.
pub fn load<S>(value: &mut S, fields: &[Field<S>], source: &VMap<'_>) {
    for field in fields {
        (field.load)(value, source);
    }
}

/// Updates the field named `key` iff `new_value` converts and differs from
/// the current value; returns whether a change was made.
///
/// Returns `false`, without error, if no field in `fields` has this key or
/// the value doesn't convert to the field's type.
pub fn set_if_changed<S>(value: &mut S, fields: &[Field<S>], key: Quark, new_value: &Variant<'_>) -> bool {
    fields.iter().find(|f| f.key == key).is_some_and(|f| (f.set_if_changed)(value, new_value))
}

/// Returns the current value of the field named `key`, iff it exists and
/// its declared type is exactly `T`.
#[must_use]
pub fn get_value<S, T: Convert>(value: &S, fields: &[Field<S>], key: Quark) -> Option<T> {
    let field = fields.iter().find(|f| f.key == key)?;
    if field.type_name != T::TYPE_NAME {
        return None;
    }
    T::from_variant(&(field.get_value)(value))
}
