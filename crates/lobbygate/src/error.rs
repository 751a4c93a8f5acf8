//! Unified error type for Lobbygate.

use lobbygate_lobby::LobbyError;
use lobbygate_protocol::{LobbyId, SessionToken};

use crate::RenderError;

/// Errors the entry flow and the HTTP adapter can produce.
///
/// Rejections and unknown lobbies are not errors of the entry flow: they
/// render an `error-page`. What is left here is fatal for the request.
#[derive(Debug, thiserror::Error)]
pub enum LobbygateError {
    /// A roster operation failed outright (not a rejection).
    #[error(transparent)]
    Lobby(#[from] LobbyError),

    /// The renderer failed. Fatal for the request.
    ///
    /// If the request had already admitted a newcomer, `credential` holds
    /// the token that was issued for them. It must still reach the client
    /// or the participant's slot can never be reclaimed.
    #[error("render failed: {source}")]
    Render {
        #[source]
        source: RenderError,
        credential: Option<SessionToken>,
    },

    /// No lobby is registered under this id.
    #[error("lobby {0} doesn't exist")]
    LobbyNotFound(LobbyId),

    /// The caller has no participant in the lobby.
    #[error("you aren't part of this lobby")]
    Unauthorized,

    /// Binding or serving the HTTP listener failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<RenderError> for LobbygateError {
    fn from(source: RenderError) -> Self {
        Self::Render {
            source,
            credential: None,
        }
    }
}
