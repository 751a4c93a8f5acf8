//! Participant types: the server's record of one admitted user.
//!
//! A participant tracks:
//! - WHO they are publicly (`ParticipantId`, display name)
//! - HOW they prove it (a secret `SessionToken`)
//! - WHERE they last came from (source address, for per-address quotas)
//! - WHETHER a live transport is attached right now

use std::net::IpAddr;

use lobbygate_protocol::{
    ConnectionId, ParticipantId, ParticipantView, SessionToken,
};

// ---------------------------------------------------------------------------
// ConnectionStatus
// ---------------------------------------------------------------------------

/// Whether a participant currently has a live transport.
///
/// ```text
///   NotConnected ──(attach)──→ Connected(conn)
///        ↑                          │
///        └─────────(detach)─────────┘
/// ```
///
/// The handle lives inside the `Connected` variant, so "connected but no
/// handle" is not a value this type can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionStatus {
    /// No transport attached. The participant may come back with their
    /// token and pick up where they left off.
    #[default]
    NotConnected,

    /// A transport is attached and alive.
    Connected(ConnectionId),
}

impl ConnectionStatus {
    /// Returns `true` if a live transport is attached.
    pub fn is_connected(&self) -> bool {
        matches!(self, Self::Connected(_))
    }

    /// Returns the live transport handle, if any.
    pub fn connection(&self) -> Option<ConnectionId> {
        match self {
            Self::Connected(conn) => Some(*conn),
            Self::NotConnected => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Participant
// ---------------------------------------------------------------------------

/// A single admitted user's identity within one lobby.
///
/// Created by [`Roster::issue`](crate::Roster::issue) and destroyed only
/// when the whole lobby is torn down.
#[derive(Debug, Clone)]
pub struct Participant {
    pub(crate) id: ParticipantId,
    pub(crate) name: String,
    pub(crate) token: SessionToken,
    pub(crate) last_known_address: IpAddr,
    pub(crate) status: ConnectionStatus,
}

impl Participant {
    /// Public participant id.
    pub fn id(&self) -> ParticipantId {
        self.id
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The address this participant's most recent request came from.
    pub fn last_known_address(&self) -> IpAddr {
        self.last_known_address
    }

    /// Current connection status.
    pub fn status(&self) -> ConnectionStatus {
        self.status
    }

    /// Returns `true` if `token` is the one issued to this participant.
    pub fn owns(&self, token: &SessionToken) -> bool {
        self.token == *token
    }

    /// The public view of this participant (never includes the token).
    pub fn view(&self) -> ParticipantView {
        ParticipantView {
            id: self.id,
            name: self.name.clone(),
            connected: self.status.is_connected(),
        }
    }
}
