//! Error types for the locale layer.

/// Why an `Accept-Language` header couldn't be parsed.
///
/// These never reach a user. The negotiator logs them and falls back to
/// the default translation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LocaleError {
    /// A language tag is not well-formed.
    #[error("invalid language tag: {0:?}")]
    InvalidTag(String),

    /// A `;q=` weight is missing its value, not a number, or outside 0..=1.
    #[error("invalid quality weight: {0:?}")]
    InvalidWeight(String),

    /// The header has an unreasonable number of subtags.
    #[error("language list too large")]
    TooLarge,
}
