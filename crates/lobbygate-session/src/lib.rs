//! Participant session management for Lobbygate.
//!
//! This crate owns the records that make session continuity work:
//!
//! 1. **Participants** ([`Participant`]): one admitted user inside one
//!    lobby, with their last-known address and connection status.
//! 2. **Resolution** ([`Roster::resolve`]): mapping the token a client
//!    replays to the participant it was issued for.
//! 3. **Issuance** ([`Roster::issue`]): creating a participant and the
//!    one-time secret that identifies it from then on.
//!
//! # How it fits in the stack
//!
//! ```text
//! Lobby Layer (above)  ← decides WHETHER to resolve, refresh, or issue
//!     ↕
//! Session Layer (this crate)  ← stores participants and their tokens
//!     ↕
//! Protocol Layer (below)  ← provides ParticipantId, SessionToken, views
//! ```
//!
//! A [`Roster`] is not synchronized. The lobby layer keeps it behind a
//! per-lobby lock and performs check-then-insert under that one lock.

mod error;
mod participant;
mod roster;

pub use error::SessionError;
pub use participant::{ConnectionStatus, Participant};
pub use roster::{IssuedSession, Roster, MAX_NAME_LEN};
