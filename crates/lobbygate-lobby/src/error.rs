//! Error types for the lobby layer.

use lobbygate_protocol::LobbyId;
use lobbygate_session::SessionError;

/// Errors that can occur during lobby operations.
///
/// The first three variants are admission rejections: terminal for the
/// request, and nothing in the lobby was changed.
#[derive(Debug, thiserror::Error)]
pub enum LobbyError {
    /// Every slot is taken.
    #[error("lobby {0} is full")]
    Full(LobbyId),

    /// The caller's source address already holds its quota of
    /// participants in this lobby.
    #[error("per-address quota exceeded in lobby {0}")]
    QuotaExceeded(LobbyId),

    /// The presented token belongs to a participant that already has a
    /// live transport (an open tab elsewhere).
    #[error("duplicate session in lobby {0}")]
    DuplicateSession(LobbyId),

    /// A lobby with this id is already registered.
    #[error("lobby {0} already exists")]
    AlreadyExists(LobbyId),

    /// A roster operation failed.
    #[error(transparent)]
    Session(#[from] SessionError),
}

impl LobbyError {
    /// Returns `true` for the admission rejections (full, quota,
    /// duplicate session).
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::Full(_) | Self::QuotaExceeded(_) | Self::DuplicateSession(_)
        )
    }

    /// The message shown to the person whose request was turned away.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Full(_) => "Sorry, but the lobby is full.",
            Self::QuotaExceeded(_) => {
                "Sorry, but you have exceeded the maximum number of clients per IP."
            }
            Self::DuplicateSession(_) => {
                "It appears you already have an open tab for this lobby."
            }
            Self::AlreadyExists(_) | Self::Session(_) => {
                "Sorry, something went wrong while entering the lobby."
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejections_are_flagged() {
        let id = LobbyId::new("abc");
        assert!(LobbyError::Full(id.clone()).is_rejection());
        assert!(LobbyError::QuotaExceeded(id.clone()).is_rejection());
        assert!(LobbyError::DuplicateSession(id.clone()).is_rejection());
        assert!(!LobbyError::AlreadyExists(id).is_rejection());
    }

    #[test]
    fn test_user_message_is_descriptive() {
        let id = LobbyId::new("abc");
        assert!(LobbyError::Full(id.clone()).user_message().contains("full"));
        assert!(LobbyError::QuotaExceeded(id.clone())
            .user_message()
            .contains("per IP"));
        assert!(LobbyError::DuplicateSession(id)
            .user_message()
            .contains("open tab"));
    }
}
