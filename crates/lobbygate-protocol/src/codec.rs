//! Codec trait and implementations for serializing views.
//!
//! A codec turns Rust values into raw bytes.
//! The HTTP adapter and the default renderer don't care HOW a participant
//! list or a page model becomes bytes; they just need something that
//! implements [`Codec`].

use serde::Serialize;

use crate::ProtocolError;

/// A codec that can encode Rust types to bytes.
///
/// ## Trait bounds explained
///
/// - `Send + Sync` → safe to share between request handlers running on
///   different threads of the Tokio pool.
/// - `'static` → the codec owns everything it needs, so it can live in
///   long-lived shared server state.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into bytes.
    ///
    /// # Errors
    /// Returns `ProtocolError::Encode` if serialization fails.
    fn encode<T: Serialize>(
        &self,
        value: &T,
    ) -> Result<Vec<u8>, ProtocolError>;

    /// The `Content-Type` of encoded values.
    fn content_type(&self) -> &'static str;
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] that uses JSON (via `serde_json`).
///
/// This is behind the `json` feature flag (enabled by default).
///
/// ## Example
///
/// ```rust
/// use lobbygate_protocol::{Codec, JsonCodec, ParticipantId, ParticipantView};
///
/// let codec = JsonCodec;
/// let view = ParticipantView {
///     id: ParticipantId(1),
///     name: "Alice".into(),
///     connected: false,
/// };
///
/// let bytes = codec.encode(&view).unwrap();
/// assert_eq!(bytes, br#"{"id":1,"name":"Alice","connected":false}"#);
/// ```
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode<T: Serialize>(
        &self,
        value: &T,
    ) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(value).map_err(ProtocolError::Encode)
    }

    fn content_type(&self) -> &'static str {
        "application/json"
    }
}
