//! The roster: the ordered participant collection of one lobby.
//!
//! This is the central piece of the session layer. It's responsible for:
//! - Resolving a replayed session token to its participant
//! - Issuing new participants with fresh, unique tokens
//! - Counting participants per source address (for quotas)
//! - Refreshing addresses and tracking transport attach/detach
//!
//! # Concurrency note
//!
//! `Roster` is NOT thread-safe by itself; it uses a plain `Vec` and
//! `HashMap`. The lobby layer wraps it in a per-lobby mutex, so a
//! capacity check, a quota count, and the following `issue()` all run
//! under the same guard.

use std::collections::HashMap;
use std::net::IpAddr;

use lobbygate_protocol::{
    ConnectionId, ParticipantId, ParticipantView, SessionToken,
};
use rand::Rng;

use crate::{ConnectionStatus, Participant, SessionError};

/// Display names longer than this are truncated.
pub const MAX_NAME_LEN: usize = 30;

/// The result of a successful [`Roster::issue`].
///
/// The token is the externally presented credential. It is handed back
/// exactly once, here; the roster never returns it again.
#[derive(Debug)]
pub struct IssuedSession {
    /// The new participant's public id.
    pub participant_id: ParticipantId,
    /// The secret to deliver to the client.
    pub token: SessionToken,
}

/// The participants of one lobby, in admission order.
///
/// ## Lifecycle
///
/// ```text
/// issue() ──→ [NotConnected] ──attach()──→ [Connected]
///                   ↑                          │
///                   └────────detach()──────────┘
/// ```
///
/// Participants are never removed individually; they go away with the
/// lobby.
#[derive(Debug, Default)]
pub struct Roster {
    /// Participants in admission order. Slot accounting is positional:
    /// the n-th admitted participant occupies slot n.
    participants: Vec<Participant>,

    /// An index from session tokens to positions in `participants`.
    ///
    /// Kept in sync with `participants`; a token maps to at most one
    /// participant because `issue()` refuses to reuse one.
    tokens: HashMap<SessionToken, usize>,

    /// Next public participant id to hand out.
    next_id: u64,
}

impl Roster {
    /// Creates an empty roster.
    pub fn new() -> Self {
        Self::default()
    }

    /// Finds the participant a replayed token belongs to.
    ///
    /// Returns `None` when no token was presented or when it matches
    /// nobody in this lobby. A token from another lobby is just an
    /// unknown token here.
    pub fn resolve(&self, token: Option<&SessionToken>) -> Option<&Participant> {
        let index = *self.tokens.get(token?)?;
        self.participants.get(index)
    }

    /// Creates a new participant and returns their one-time credential.
    ///
    /// The participant starts `NotConnected` with `address` as its
    /// last-known address, and from now on counts against the lobby's
    /// capacity and that address's quota. This method does not check
    /// either limit; the caller decides admission first.
    ///
    /// `name` is trimmed and cut to [`MAX_NAME_LEN`] characters. A blank
    /// or missing name becomes `Player <slot>`.
    pub fn issue(&mut self, name: Option<&str>, address: IpAddr) -> IssuedSession {
        let token = self.unused_token();
        self.next_id += 1;
        let id = ParticipantId(self.next_id);
        let slot = self.participants.len() + 1;

        let participant = Participant {
            id,
            name: display_name(name, slot),
            token: token.clone(),
            last_known_address: address,
            status: ConnectionStatus::NotConnected,
        };

        self.tokens.insert(token.clone(), self.participants.len());
        self.participants.push(participant);

        tracing::debug!(participant_id = %id, slot, "participant issued");

        IssuedSession {
            participant_id: id,
            token,
        }
    }

    /// Records the address a returning participant came from.
    ///
    /// # Errors
    /// Returns [`SessionError::NotFound`] if no such participant exists.
    pub fn refresh_address(
        &mut self,
        id: ParticipantId,
        address: IpAddr,
    ) -> Result<(), SessionError> {
        let participant = self.get_mut(id)?;
        participant.last_known_address = address;
        Ok(())
    }

    /// Marks a participant as connected through `conn`.
    ///
    /// # Errors
    /// - [`SessionError::NotFound`]: unknown participant
    /// - [`SessionError::AlreadyConnected`]: a transport is already live
    pub fn attach(
        &mut self,
        id: ParticipantId,
        conn: ConnectionId,
    ) -> Result<(), SessionError> {
        let participant = self.get_mut(id)?;
        if participant.status.is_connected() {
            return Err(SessionError::AlreadyConnected(id));
        }
        participant.status = ConnectionStatus::Connected(conn);
        Ok(())
    }

    /// Marks a participant as no longer connected.
    ///
    /// Returns `true` if a transport was attached. Detaching an already
    /// disconnected participant is a no-op.
    ///
    /// # Errors
    /// Returns [`SessionError::NotFound`] if no such participant exists.
    pub fn detach(&mut self, id: ParticipantId) -> Result<bool, SessionError> {
        let participant = self.get_mut(id)?;
        let was_connected = participant.status.is_connected();
        participant.status = ConnectionStatus::NotConnected;
        Ok(was_connected)
    }

    /// Counts participants whose last-known address is `address`.
    pub fn count_from(&self, address: IpAddr) -> usize {
        self.participants
            .iter()
            .filter(|p| p.last_known_address == address)
            .count()
    }

    /// Counts participants with a live transport.
    pub fn connected_count(&self) -> usize {
        self.participants
            .iter()
            .filter(|p| p.status.is_connected())
            .count()
    }

    /// Looks up a participant by public id.
    pub fn get(&self, id: ParticipantId) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id == id)
    }

    /// Iterates participants in admission order.
    pub fn iter(&self) -> impl Iterator<Item = &Participant> {
        self.participants.iter()
    }

    /// Public views of every participant, in admission order.
    pub fn views(&self) -> Vec<ParticipantView> {
        self.participants.iter().map(Participant::view).collect()
    }

    /// Returns the number of participants.
    pub fn len(&self) -> usize {
        self.participants.len()
    }

    /// Returns `true` if nobody has been admitted yet.
    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    fn get_mut(
        &mut self,
        id: ParticipantId,
    ) -> Result<&mut Participant, SessionError> {
        self.participants
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(SessionError::NotFound(id))
    }

    /// Draws tokens until one is not already in use.
    fn unused_token(&self) -> SessionToken {
        loop {
            let token = generate_token();
            if !self.tokens.contains_key(&token) {
                return token;
            }
        }
    }
}

/// Generates a random 32-character hex string (128 bits of entropy).
///
/// Guessing a live token is computationally infeasible, which is what
/// lets a token stand in for a login.
fn generate_token() -> SessionToken {
    let mut rng = rand::rng();
    let bytes: [u8; 16] = rng.random();
    SessionToken::new(bytes.iter().map(|b| format!("{b:02x}")).collect::<String>())
}

fn display_name(requested: Option<&str>, slot: usize) -> String {
    match requested.map(str::trim) {
        Some(name) if !name.is_empty() => {
            name.chars().take(MAX_NAME_LEN).collect()
        }
        _ => format!("Player {slot}"),
    }
}

// =========================================================================
// Tests
// =========================================================================
