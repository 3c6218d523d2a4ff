use thiserror::Error;

/// Failure performing a typed mutation against a variant of the wrong kind.
///
/// Accessors never fail this way; they return `Option`/`None` instead. Only
/// the typed mutators (`push_int`, `try_emplace`, ...) reject a call that
/// cannot be expressed against the variant's current discriminant.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariantError {
    #[error("expected a {expected} variant")]
    TypeMismatch { expected: &'static str },
}
