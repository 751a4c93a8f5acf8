//! Lobby instances and admission control for Lobbygate.
//!
//! Each lobby owns its participant roster behind its own lock. Admission
//! decisions for one lobby are serialized; different lobbies never
//! contend with each other.
//!
//! # Key types
//!
//! - [`Lobby`]: one lobby instance; [`Lobby::enter`] is the atomic
//!   resolve → decide → refresh-or-issue step
//! - [`Decision`] / [`decide`]: the admission decision table
//! - [`LobbyRegistry`]: lookup by id, the seam the entry flow depends on
//! - [`InMemoryLobbyRegistry`]: the process-wide registry implementation
//! - [`LobbyConfig`]: capacity and per-address quota

mod admission;
mod config;
mod error;
mod lobby;
mod registry;

pub use admission::{Decision, decide};
pub use config::LobbyConfig;
pub use error::LobbyError;
pub use lobby::{Entry, Lobby};
pub use registry::{InMemoryLobbyRegistry, LobbyRegistry};
