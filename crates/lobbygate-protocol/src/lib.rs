//! Shared vocabulary for Lobbygate.
//!
//! This crate defines the types every other layer talks in:
//!
//! - **Identity** ([`LobbyId`], [`ParticipantId`], [`ConnectionId`],
//!   [`SessionToken`]): who and what a request is about.
//! - **Public views** ([`LobbyData`], [`ParticipantView`]): the parts of
//!   a lobby that are safe to show to any caller.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how views are turned
//!   into bytes for a response body.
//! - **Errors** ([`ProtocolError`]).
//!
//! # Architecture
//!
//! ```text
//! Protocol (ids, views) → Session (roster) → Lobby (admission) → Lobbygate (entry flow)
//! ```

mod codec;
mod error;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{
    ConnectionId, LobbyData, LobbyId, ParticipantId, ParticipantView,
    SessionToken,
};
