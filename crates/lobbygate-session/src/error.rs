//! Error types for the session layer.

use lobbygate_protocol::ParticipantId;

/// Errors that can occur while mutating a roster.
///
/// Resolution never fails: an unknown token simply resolves to nobody.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// No participant with this id exists in the roster.
    #[error("participant {0} not found")]
    NotFound(ParticipantId),

    /// The participant already has a live transport attached.
    /// At most one transport may be live per session token.
    #[error("participant {0} already has a live connection")]
    AlreadyConnected(ParticipantId),
}
