//! The lobby entry flow.
//!
//! Every request to open a lobby runs through [`LobbyEntry::enter_lobby`]
//! exactly once:
//!
//! ```text
//! lookup ─ not found ───────────────────────────────→ error-page
//!   │
//! classify ─ non-interactive ───────────────────────→ robot-page
//!   │
//! enter (resolve → decide → refresh | issue, atomic)
//!   ├─ full / quota / duplicate ────────────────────→ error-page
//!   ├─ admitted → credential out ─┐
//!   └─ resumed ───────────────────┴→ negotiate locale → lobby-page
//! ```
//!
//! The flow is synchronous: nothing in it waits on I/O, and the only
//! lock it takes is the lobby's own roster lock, once inside
//! [`Lobby::enter`](lobbygate_lobby::Lobby::enter) and once for the
//! page's [`snapshot`](lobbygate_lobby::Lobby::snapshot).

use std::net::IpAddr;
use std::sync::Arc;

use lobbygate_lobby::{Entry, LobbyError, LobbyRegistry};
use lobbygate_locale::TranslationCatalog;
use lobbygate_protocol::{LobbyId, ParticipantId, ParticipantView, SessionToken};
use serde::Serialize;

use crate::page::{ErrorPage, LobbyPage, RobotPage};
use crate::{ClientKind, LobbygateError, RenderError, Renderer, Template, classify};

const LOBBY_NOT_FOUND_MESSAGE: &str = "Sorry, but the requested lobby doesn't exist.";

/// Everything the entry flow needs to know about one request.
///
/// Transport details are already stripped: the HTTP adapter has pulled
/// the credential out of its cookie and resolved the source address.
#[derive(Debug, Clone)]
pub struct EntryRequest {
    pub lobby_id: LobbyId,
    /// The session credential the client presented, if any.
    pub credential: Option<SessionToken>,
    pub source_address: IpAddr,
    pub user_agent: Option<String>,
    /// Raw `Accept-Language` header value.
    pub accept_language: Option<String>,
    /// Requested display name. Only used if a new participant is issued.
    pub display_name: Option<String>,
}

/// Why an interactive client was turned away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    Full,
    QuotaExceeded,
    DuplicateSession,
}

impl Rejection {
    fn of(error: &LobbyError) -> Option<Self> {
        match error {
            LobbyError::Full(_) => Some(Self::Full),
            LobbyError::QuotaExceeded(_) => Some(Self::QuotaExceeded),
            LobbyError::DuplicateSession(_) => Some(Self::DuplicateSession),
            LobbyError::AlreadyExists(_) | LobbyError::Session(_) => None,
        }
    }
}

/// How a request ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryOutcome {
    /// Non-interactive client; public metadata only.
    Degraded,
    /// A new participant was admitted and a credential issued.
    Admitted(ParticipantId),
    /// A returning participant was recognized.
    Resumed(ParticipantId),
    /// The lobby turned the request away.
    Rejected(Rejection),
    /// No such lobby.
    LobbyNotFound,
}

/// A rendered response plus what the transport must do with it.
#[derive(Debug)]
pub struct EntryResponse {
    pub outcome: EntryOutcome,
    pub template: Template,
    pub body: Vec<u8>,
    /// Set only on [`EntryOutcome::Admitted`]. The transport must deliver
    /// it to the client (as a cookie, say). It is not available again.
    pub credential: Option<SessionToken>,
    /// The negotiated locale, for pages rendered with a translation.
    pub locale: Option<String>,
}

/// The lobby entry orchestrator.
///
/// Holds its collaborators explicitly: the registry to find lobbies in,
/// the catalog to negotiate locales against, and the renderer.
pub struct LobbyEntry<L: LobbyRegistry, R: Renderer> {
    registry: Arc<L>,
    catalog: TranslationCatalog,
    renderer: R,
}

impl<L: LobbyRegistry, R: Renderer> LobbyEntry<L, R> {
    /// Creates an orchestrator over the given collaborators.
    pub fn new(registry: Arc<L>, catalog: TranslationCatalog, renderer: R) -> Self {
        Self {
            registry,
            catalog,
            renderer,
        }
    }

    /// The registry lobbies are looked up in.
    pub fn registry(&self) -> &Arc<L> {
        &self.registry
    }

    /// The renderer pages are produced with.
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Runs the entry flow for one request.
    ///
    /// Lobby-not-found and admission rejections are not errors here:
    /// they produce an `error-page` response whose
    /// [`outcome`](EntryResponse::outcome) says what happened.
    ///
    /// # Errors
    /// - [`LobbygateError::Render`] if a page can't be rendered. When the
    ///   request admitted a newcomer, the error carries their credential.
    /// - [`LobbygateError::Lobby`] if a roster operation fails outright
    pub fn enter_lobby(
        &self,
        request: &EntryRequest,
    ) -> Result<EntryResponse, LobbygateError> {
        let Some(lobby) = self.registry.lookup(&request.lobby_id) else {
            tracing::debug!(lobby_id = %request.lobby_id, "lobby not found");
            return self.error_page(EntryOutcome::LobbyNotFound, LOBBY_NOT_FOUND_MESSAGE);
        };

        if classify(request.user_agent.as_deref()) == ClientKind::NonInteractive {
            tracing::debug!(
                lobby_id = %request.lobby_id,
                user_agent = request.user_agent.as_deref().unwrap_or(""),
                "non-interactive client, rendering public metadata"
            );
            let body = self.render(Template::RobotPage, &RobotPage { lobby: lobby.data() })?;
            return Ok(EntryResponse {
                outcome: EntryOutcome::Degraded,
                template: Template::RobotPage,
                body,
                credential: None,
                locale: None,
            });
        }

        let entry = lobby.enter(
            request.credential.as_ref(),
            request.source_address,
            request.display_name.as_deref(),
        );

        let (outcome, participant_id, credential) = match entry {
            Ok(Entry::Admitted(issued)) => (
                EntryOutcome::Admitted(issued.participant_id),
                issued.participant_id,
                Some(issued.token),
            ),
            Ok(Entry::Resumed(id)) => (EntryOutcome::Resumed(id), id, None),
            Err(e) => {
                let Some(rejection) = Rejection::of(&e) else {
                    return Err(e.into());
                };
                return self.error_page(EntryOutcome::Rejected(rejection), e.user_message());
            }
        };

        let resolution = self.catalog.negotiate(request.accept_language.as_deref());
        let (data, participants) = lobby.snapshot();
        let page = LobbyPage {
            lobby: data,
            participant_id,
            participants,
            translation: &resolution.translation,
            locale: &resolution.locale,
        };
        // The admission stands even if the page doesn't, so a freshly
        // issued credential travels with the error.
        let body = match self.render(Template::LobbyPage, &page) {
            Ok(body) => body,
            Err(source) => return Err(LobbygateError::Render { source, credential }),
        };

        Ok(EntryResponse {
            outcome,
            template: Template::LobbyPage,
            body,
            credential,
            locale: Some(resolution.locale),
        })
    }

    /// Lists a lobby's participants for someone who is in it.
    ///
    /// # Errors
    /// - [`LobbygateError::LobbyNotFound`] if there is no such lobby
    /// - [`LobbygateError::Unauthorized`] if `credential` doesn't resolve
    ///   to a participant of this lobby
    pub fn list_participants(
        &self,
        lobby_id: &LobbyId,
        credential: Option<&SessionToken>,
    ) -> Result<Vec<ParticipantView>, LobbygateError> {
        let lobby = self
            .registry
            .lookup(lobby_id)
            .ok_or_else(|| LobbygateError::LobbyNotFound(lobby_id.clone()))?;

        lobby.participants_for(credential).ok_or_else(|| {
            tracing::debug!(%lobby_id, "participant list denied");
            LobbygateError::Unauthorized
        })
    }

    /// Renders the page for an id that names no lobby.
    ///
    /// # Errors
    /// Returns [`LobbygateError::Render`] if the page can't be rendered.
    pub fn not_found_page(&self) -> Result<EntryResponse, LobbygateError> {
        self.error_page(EntryOutcome::LobbyNotFound, LOBBY_NOT_FOUND_MESSAGE)
    }

    fn error_page(
        &self,
        outcome: EntryOutcome,
        message: &str,
    ) -> Result<EntryResponse, LobbygateError> {
        let body = self.render(Template::ErrorPage, &ErrorPage { message })?;
        Ok(EntryResponse {
            outcome,
            template: Template::ErrorPage,
            body,
            credential: None,
            locale: None,
        })
    }

    fn render<T: Serialize>(
        &self,
        template: Template,
        data: &T,
    ) -> Result<Vec<u8>, RenderError> {
        self.renderer.render(template, data).inspect_err(|e| {
            tracing::error!(%template, error = %e, "render failed");
        })
    }
}
