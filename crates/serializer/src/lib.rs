//! Field-table (de)serialization for [`btcore_variant::Variant`], plus a
//! kebab-case/snake_case key-casing adapter usable independently of it.

mod convert;
mod field;
mod kebab;
mod registry;

pub use convert::Convert;
pub use field::{get_value, load, save, set_if_changed, Field};
pub use kebab::{kebab_to_snake, snake_to_kebab, tree_kebab_to_snake, tree_snake_to_kebab};
pub use registry::{from_variant_dynamic, register_dynamic, to_variant_dynamic};
