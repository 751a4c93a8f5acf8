//! Error types for the protocol layer.
//!
//! Each crate in Lobbygate defines its own error enum. When you see a
//! `ProtocolError`, the problem is in turning a view into bytes, not in
//! admission or rendering.

/// Errors that can occur while encoding public views.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (turning a Rust type into bytes).
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// A value is well-formed but not acceptable, e.g. an empty lobby id.
    #[error("invalid value: {0}")]
    InvalidValue(String),
}
