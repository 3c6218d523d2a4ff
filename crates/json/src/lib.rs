//! A JSON subset sufficient for RPC and settings, decoding into and encoding
//! from [`btcore_variant::Variant`].

mod decode;
mod encode;
mod error;

pub use decode::{decode, ParseMode};
pub use encode::{compact, encode, pretty, Style};
pub use error::{JsonError, JsonErrorKind};
