use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{OnceLock, RwLock};

use btcore_variant::Variant;

type FromVariantFn = Box<dyn Fn(&Variant<'_>) -> Option<Box<dyn Any + Send + Sync>> + Send + Sync>;
type ToVariantFn = Box<dyn Fn(&(dyn Any + Send + Sync)) -> Variant<'static> + Send + Sync>;

struct DynConverter {
    from: FromVariantFn,
    to: ToVariantFn,
}

static REGISTRY: OnceLock<RwLock<HashMap<TypeId, DynConverter>>> = OnceLock::new();

fn registry() -> &'static RwLock<HashMap<TypeId, DynConverter>> {
    REGISTRY.get_or_init(|| RwLock::new(HashMap::new()))
}

/// Registers a `Variant <-> T` conversion pair at runtime.
///
/// This is a fallback for types a caller can't implement [`crate::Convert`]
/// on directly, such as a type defined in a dependency they don't own. Types
/// under the caller's control should implement `Convert` instead; field
/// tables only ever dispatch through `Convert`, never through this registry.
pub fn register_dynamic<T>(from: impl Fn(&Variant<'_>) -> Option<T> + Send + Sync + 'static, to: impl Fn(&T) -> Variant<'static> + Send + Sync + 'static)
where
    T: Any + Send + Sync + 'static,
{
    let converter = DynConverter {
        from: Box::new(move |v| from(v).map(|t| Box::new(t) as Box<dyn Any + Send + Sync>)),
        to: Box::new(move |any| {
            let t = any.downcast_ref::<T>().expect("registry only ever stores T under TypeId::of::<T>()");
            to(t)
        }),
    };
    registry().write().expect("serializer registry poisoned").insert(TypeId::of::<T>(), converter);
}

/// Converts `value` using a converter previously registered for `T` with
/// [`register_dynamic`]. Returns `None` if none is registered.
#[must_use]
pub fn to_variant_dynamic<T: Any + Send + Sync + 'static>(value: &T) -> Option<Variant<'static>> {
    let registry = registry().read().expect("serializer registry poisoned");
    let converter = registry.get(&TypeId::of::<T>())?;
    Some((converter.to)(value))
}

/// Converts `value` back to a `T` using a converter previously registered
/// for `T` with [`register_dynamic`]. Returns `None` if none is registered,
/// or if the registered converter rejects `value`.
#[must_use]
pub fn from_variant_dynamic<T: Any + Send + Sync + Clone + 'static>(value: &Variant<'_>) -> Option<T> {
    let registry = registry().read().expect("serializer registry poisoned");
    let converter = registry.get(&TypeId::of::<T>())?;
    let any = (converter.from)(value)?;
    any.downcast_ref::<T>().cloned()
}
