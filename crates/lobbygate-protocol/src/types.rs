//! Core types shared by every Lobbygate layer.
//!
//! Identity newtypes live here so that the session, lobby, and entry
//! layers agree on what a "lobby id" or a "session token" is without
//! depending on each other.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ProtocolError;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// The identifier of a lobby, as it appears in a URL (`/lobby/{id}`).
///
/// Lobby ids are strings rather than numbers because they are handed out
/// to humans as invite links. The registry generates them; clients only
/// ever echo them back.
///
/// `#[serde(transparent)]` makes a `LobbyId("a1b2")` serialize as just
/// `"a1b2"` instead of `{ "0": "a1b2" }`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LobbyId(String);

impl LobbyId {
    /// Longest id accepted from the outside world.
    pub const MAX_LEN: usize = 64;

    /// Wraps an id the server generated itself. No validation.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Parses an id supplied by a client (a URL path segment).
    ///
    /// Accepts 1 to [`MAX_LEN`](Self::MAX_LEN) ASCII letters, digits, or
    /// `-`. Anything else cannot name a lobby we created, so it is
    /// rejected before touching the registry.
    ///
    /// # Errors
    /// Returns [`ProtocolError::InvalidValue`] for empty, overlong, or
    /// non-alphanumeric input.
    pub fn parse(raw: &str) -> Result<Self, ProtocolError> {
        if raw.is_empty() || raw.len() > Self::MAX_LEN {
            return Err(ProtocolError::InvalidValue(format!(
                "lobby id must be 1-{} characters",
                Self::MAX_LEN
            )));
        }
        if !raw.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err(ProtocolError::InvalidValue(
                "lobby id contains invalid characters".into(),
            ));
        }
        Ok(Self(raw.to_string()))
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LobbyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The public identity of a participant inside one lobby.
///
/// Unlike the [`SessionToken`], this id is safe to show to everyone in
/// the lobby: it identifies a participant but grants nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(pub u64);

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{}", self.0)
    }
}

/// Opaque identifier for a live transport (e.g. a websocket).
///
/// The transport layer owns connections; the lobby only remembers which
/// connection, if any, a participant is currently attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Creates a new `ConnectionId` from a raw `u64`.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the underlying `u64` value.
    pub fn into_inner(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// SessionToken
// ---------------------------------------------------------------------------

/// The secret a client presents to prove it is a returning participant.
///
/// A token is handed out exactly once, when a participant is admitted,
/// and the client replays it on every later request (as a cookie). Anyone
/// holding it *is* that participant, so it must never end up in logs:
///
/// - `Debug` prints `SessionToken(<redacted>)`.
/// - There is deliberately no `Display` and no `Serialize`, so it can't
///   slip into a `tracing` field or a JSON body by accident.
///
/// Use [`expose`](Self::expose) at the single place the raw value has to
/// leave the process (the `Set-Cookie` header).
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SessionToken(String);

impl SessionToken {
    /// Wraps a raw token value (freshly generated or read from a cookie).
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Returns the raw secret. Only for writing it back to the client.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(<redacted>)")
    }
}

// ---------------------------------------------------------------------------
// Public views
// ---------------------------------------------------------------------------

/// What anyone in a lobby may see about one participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantView {
    /// Public participant id.
    pub id: ParticipantId,
    /// Display name chosen at admission.
    pub name: String,
    /// Whether the participant currently has a live transport.
    pub connected: bool,
}

/// Public lobby metadata.
///
/// This is everything a non-interactive client (crawler, link preview
/// bot) gets to see, and it is also embedded in the full lobby page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LobbyData {
    /// The lobby's id.
    pub lobby_id: LobbyId,
    /// Maximum number of participants.
    pub capacity: usize,
    /// Maximum number of participants sharing one source address.
    pub per_address_quota: usize,
    /// Participants admitted so far (connected or not).
    pub participant_count: usize,
    /// Participants with a live transport.
    pub connected_count: usize,
}
