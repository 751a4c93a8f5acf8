//! A lobby instance: configuration plus a locked participant roster.
//!
//! Concurrent requests for the same lobby each run [`Lobby::enter`] on
//! their own thread. The capacity check, the per-address count, and the
//! insertion of a new participant happen under one lock acquisition, so
//! two requests can never both see "one slot left" and both take it.

use std::net::IpAddr;
use std::sync::{Mutex, MutexGuard, PoisonError};

use lobbygate_protocol::{
    ConnectionId, LobbyData, LobbyId, ParticipantId, ParticipantView,
    SessionToken,
};
use lobbygate_session::{IssuedSession, Roster};

use crate::{Decision, LobbyConfig, LobbyError, decide};

/// The successful outcomes of [`Lobby::enter`].
#[derive(Debug)]
pub enum Entry {
    /// A newcomer was admitted. The token must be delivered to the
    /// client; this is the only time it is available.
    Admitted(IssuedSession),

    /// A returning participant was recognized and their address
    /// refreshed. No new slot was consumed and no token is re-sent.
    Resumed(ParticipantId),
}

impl Entry {
    /// The participant this entry belongs to.
    pub fn participant_id(&self) -> ParticipantId {
        match self {
            Self::Admitted(issued) => issued.participant_id,
            Self::Resumed(id) => *id,
        }
    }
}

/// One multiplayer lobby.
///
/// Shared between request handlers as `Arc<Lobby>`; all mutation goes
/// through `&self` methods that take the roster lock.
#[derive(Debug)]
pub struct Lobby {
    id: LobbyId,
    config: LobbyConfig,
    roster: Mutex<Roster>,
}

impl Lobby {
    /// Creates an empty lobby.
    pub fn new(id: LobbyId, config: LobbyConfig) -> Self {
        Self {
            id,
            config,
            roster: Mutex::new(Roster::new()),
        }
    }

    /// The lobby's id.
    pub fn id(&self) -> &LobbyId {
        &self.id
    }

    /// The lobby's limits.
    pub fn config(&self) -> &LobbyConfig {
        &self.config
    }

    /// Admits or recognizes the caller, atomically.
    ///
    /// Resolves `token` against the roster, runs the admission decision
    /// table, and applies its outcome, all while holding the roster lock:
    ///
    /// - returning participant → address refreshed → [`Entry::Resumed`]
    /// - newcomer with room → participant issued → [`Entry::Admitted`]
    ///
    /// `name` is only used when a new participant is issued.
    ///
    /// # Errors
    /// - [`LobbyError::DuplicateSession`]: token's participant is connected
    /// - [`LobbyError::Full`]: no free slot
    /// - [`LobbyError::QuotaExceeded`]: address already at its quota
    ///
    /// A rejected request leaves the lobby untouched.
    pub fn enter(
        &self,
        token: Option<&SessionToken>,
        address: IpAddr,
        name: Option<&str>,
    ) -> Result<Entry, LobbyError> {
        let mut roster = self.roster();

        let resolved = roster.resolve(token);
        let decision = decide(&self.config, &roster, resolved, address);

        match decision {
            Decision::RejectDuplicateSession => {
                tracing::warn!(lobby_id = %self.id, %address, "duplicate session rejected");
                Err(LobbyError::DuplicateSession(self.id.clone()))
            }
            Decision::ContinueExisting(participant_id) => {
                roster.refresh_address(participant_id, address)?;
                tracing::info!(
                    lobby_id = %self.id,
                    %participant_id,
                    %address,
                    "participant resumed"
                );
                Ok(Entry::Resumed(participant_id))
            }
            Decision::RejectFull => {
                tracing::warn!(
                    lobby_id = %self.id,
                    capacity = self.config.capacity,
                    "lobby full"
                );
                Err(LobbyError::Full(self.id.clone()))
            }
            Decision::RejectQuota => {
                tracing::warn!(
                    lobby_id = %self.id,
                    %address,
                    quota = self.config.per_address_quota,
                    "per-address quota exceeded"
                );
                Err(LobbyError::QuotaExceeded(self.id.clone()))
            }
            Decision::AdmitAsNew => {
                let issued = roster.issue(name, address);
                tracing::info!(
                    lobby_id = %self.id,
                    participant_id = %issued.participant_id,
                    %address,
                    participants = roster.len(),
                    "participant admitted"
                );
                Ok(Entry::Admitted(issued))
            }
        }
    }

    /// Resolves a token to its participant's id without changing anything.
    pub fn resolve(&self, token: Option<&SessionToken>) -> Option<ParticipantId> {
        self.roster().resolve(token).map(|p| p.id())
    }

    /// The participant list, but only for someone who is in the lobby.
    ///
    /// Returns `None` when `caller` doesn't resolve to a participant.
    /// The membership check and the snapshot are taken under one lock.
    pub fn participants_for(
        &self,
        caller: Option<&SessionToken>,
    ) -> Option<Vec<ParticipantView>> {
        let roster = self.roster();
        roster.resolve(caller)?;
        Some(roster.views())
    }

    /// A snapshot of every participant's public view, in admission order.
    pub fn participants(&self) -> Vec<ParticipantView> {
        self.roster().views()
    }

    /// Number of participants.
    pub fn participant_count(&self) -> usize {
        self.roster().len()
    }

    /// Number of participants whose last-known address is `address`.
    pub fn count_from(&self, address: IpAddr) -> usize {
        self.roster().count_from(address)
    }

    /// Public lobby metadata.
    pub fn data(&self) -> LobbyData {
        self.data_of(&self.roster())
    }

    /// Public metadata and the participant list, read under one lock so
    /// the counts always agree with the list.
    pub fn snapshot(&self) -> (LobbyData, Vec<ParticipantView>) {
        let roster = self.roster();
        (self.data_of(&roster), roster.views())
    }

    /// Called by the transport layer when a participant's live connection
    /// is established.
    ///
    /// # Errors
    /// - [`SessionError::NotFound`](lobbygate_session::SessionError::NotFound)
    /// - [`SessionError::AlreadyConnected`](lobbygate_session::SessionError::AlreadyConnected)
    pub fn attach_transport(
        &self,
        participant_id: ParticipantId,
        conn: ConnectionId,
    ) -> Result<(), LobbyError> {
        self.roster().attach(participant_id, conn)?;
        tracing::info!(lobby_id = %self.id, %participant_id, %conn, "transport attached");
        Ok(())
    }

    /// Called by the transport layer when a participant's live connection
    /// goes away.
    ///
    /// # Errors
    /// Returns a session error if the participant doesn't exist.
    pub fn detach_transport(
        &self,
        participant_id: ParticipantId,
    ) -> Result<(), LobbyError> {
        if self.roster().detach(participant_id)? {
            tracing::info!(lobby_id = %self.id, %participant_id, "transport detached");
        }
        Ok(())
    }

    /// Takes the roster lock.
    ///
    /// Every roster mutation is a single push or field write, so a
    /// holder that panicked cannot have left it half-updated; a poisoned
    /// lock is recovered rather than propagated.
    fn data_of(&self, roster: &Roster) -> LobbyData {
        LobbyData {
            lobby_id: self.id.clone(),
            capacity: self.config.capacity,
            per_address_quota: self.config.per_address_quota,
            participant_count: roster.len(),
            connected_count: roster.connected_count(),
        }
    }

    fn roster(&self) -> MutexGuard<'_, Roster> {
        self.roster.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
