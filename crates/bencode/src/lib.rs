//! Strict BEP-3 bencode codec between byte strings and
//! [`btcore_variant::Variant`].
//!
//! Decoding rejects anything the grammar doesn't license outright (leading
//! zeros, negative zero, oversized strings, unbounded nesting, duplicate
//! dictionary keys); encoding is a pure, infallible function of the variant.

mod decode;
mod encode;
mod error;
mod options;

pub use decode::{decode, ParseMode};
pub use encode::encode;
pub use error::{BencodeError, BencodeErrorKind};
pub use options::BDecodeOpts;
