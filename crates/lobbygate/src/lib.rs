//! # Lobbygate
//!
//! Lobby admission and session continuity for multiplayer web games.
//!
//! When someone opens a lobby link, Lobbygate decides who they are and
//! whether they get in: a returning participant picks up their seat, a
//! newcomer is admitted if there is room (and their address hasn't hit
//! its quota), and everything else gets a clear rejection. Crawlers get
//! the public lobby metadata and no session.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use lobbygate::prelude::*;
//!
//! # async fn run() -> Result<(), LobbygateError> {
//! let registry = Arc::new(InMemoryLobbyRegistry::new());
//! let lobby = registry.create(LobbyConfig::default());
//! println!("join at /lobby/{}", lobby.id());
//!
//! LobbygateServer::builder()
//!     .bind("0.0.0.0:8080")
//!     .build(registry)
//!     .run()
//!     .await
//! # }
//! ```
//!
//! ## Crates
//!
//! - `lobbygate-protocol`: ids, public views, the session token, codecs
//! - `lobbygate-session`: participant records and the per-lobby roster
//! - `lobbygate-lobby`: lobbies, the admission decision, the registry
//! - `lobbygate-locale`: `Accept-Language` negotiation
//! - `lobbygate` (this crate): the entry flow and its HTTP adapter

mod classify;
mod entry;
mod error;
mod origin;
mod page;
mod render;
mod server;

pub use classify::{ClientKind, classify};
pub use entry::{
    EntryOutcome, EntryRequest, EntryResponse, LobbyEntry, Rejection,
};
pub use error::LobbygateError;
pub use origin::source_address;
pub use page::{ErrorPage, LobbyPage, RobotPage};
pub use render::{CodecRenderer, RenderError, Renderer, Template};
pub use server::{
    LobbygateServer, LobbygateServerBuilder, ServerConfig, status_for,
};

/// Convenient imports for Lobbygate users.
///
/// ```rust
/// use lobbygate::prelude::*;
/// ```
pub mod prelude {
    pub use std::sync::Arc;

    pub use crate::{
        ClientKind, CodecRenderer, EntryOutcome, EntryRequest, EntryResponse,
        LobbyEntry, LobbygateError, LobbygateServer, Rejection, RenderError,
        Renderer, ServerConfig, Template,
    };

    pub use lobbygate_lobby::{
        Entry, InMemoryLobbyRegistry, Lobby, LobbyConfig, LobbyError,
        LobbyRegistry,
    };
    pub use lobbygate_locale::{
        DEFAULT_LOCALE, LocaleResolution, Translation, TranslationCatalog,
    };
    pub use lobbygate_protocol::{
        Codec, ConnectionId, JsonCodec, LobbyData, LobbyId, ParticipantId,
        ParticipantView, SessionToken,
    };
    pub use lobbygate_session::SessionError;
}
