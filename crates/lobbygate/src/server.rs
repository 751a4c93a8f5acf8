//! `LobbygateServer` builder and HTTP adapter.
//!
//! This is the thin transport layer around [`LobbyEntry`]. It pulls the
//! session credential out of its cookie, works out the source address,
//! and turns an [`EntryResponse`] back into HTTP:
//!
//! | Route                     | Operation                                   |
//! |---------------------------|---------------------------------------------|
//! | `GET /lobby/{id}`         | [`LobbyEntry::enter_lobby`]                 |
//! | `GET /lobby/{id}/players` | [`LobbyEntry::list_participants`] as JSON   |

use std::convert::Infallible;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use axum::extract::{ConnectInfo, FromRequestParts, Path, Query, State};
use axum::http::request::Parts;
use axum::http::{HeaderMap, HeaderName, HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use axum_extra::extract::CookieJar;
use axum_extra::extract::cookie::{Cookie, SameSite};
use lobbygate_lobby::{InMemoryLobbyRegistry, LobbyRegistry};
use lobbygate_locale::TranslationCatalog;
use lobbygate_protocol::{JsonCodec, LobbyId, ParticipantView, SessionToken};
use serde::Deserialize;
use tokio::net::TcpListener;

use crate::origin::source_address;
use crate::{
    CodecRenderer, EntryOutcome, EntryRequest, EntryResponse, LobbyEntry,
    LobbygateError, Rejection, Renderer,
};

/// Cookie a client may carry its preferred display name in.
const USERNAME_COOKIE: &str = "username";

/// HTTP-level settings.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on.
    pub bind_addr: String,
    /// Name of the cookie that carries the session credential.
    pub session_cookie: String,
    /// Whether `X-Forwarded-For` / `X-Real-IP` are believed. Off by
    /// default. Only turn it on behind a reverse proxy that overwrites
    /// these headers: a client that can set them itself picks its own
    /// source address and so sidesteps the per-address quota.
    pub trust_forwarded_for: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
            session_cookie: "usersession".to_string(),
            trust_forwarded_for: false,
        }
    }
}

/// Shared state handed to every request handler.
///
/// Cloned per request by axum, so both halves sit behind `Arc`.
struct AppState<L: LobbyRegistry, R: Renderer> {
    entry: Arc<LobbyEntry<L, R>>,
    config: Arc<ServerConfig>,
}

impl<L: LobbyRegistry, R: Renderer> Clone for AppState<L, R> {
    fn clone(&self) -> Self {
        Self {
            entry: Arc::clone(&self.entry),
            config: Arc::clone(&self.config),
        }
    }
}

/// Builder for configuring a Lobbygate server.
///
/// # Example
///
/// ```rust,ignore
/// use lobbygate::prelude::*;
///
/// let registry = Arc::new(InMemoryLobbyRegistry::new());
/// let server = LobbygateServer::builder()
///     .bind("0.0.0.0:8080")
///     .build(registry);
/// server.run().await
/// ```
pub struct LobbygateServerBuilder {
    config: ServerConfig,
    catalog: TranslationCatalog,
}

impl LobbygateServerBuilder {
    /// Creates a new builder with default settings and the built-in
    /// translation catalog.
    pub fn new() -> Self {
        Self {
            config: ServerConfig::default(),
            catalog: TranslationCatalog::builtin(),
        }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.config.bind_addr = addr.to_string();
        self
    }

    /// Sets the name of the session cookie.
    pub fn session_cookie(mut self, name: &str) -> Self {
        self.config.session_cookie = name.to_string();
        self
    }

    /// Sets whether forwarding headers are trusted. See
    /// [`ServerConfig::trust_forwarded_for`].
    pub fn trust_forwarded_for(mut self, trust: bool) -> Self {
        self.config.trust_forwarded_for = trust;
        self
    }

    /// Replaces the whole HTTP configuration.
    pub fn config(mut self, config: ServerConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the translation catalog.
    pub fn catalog(mut self, catalog: TranslationCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Builds the server over `registry`, rendering pages as JSON.
    pub fn build<L: LobbyRegistry>(self, registry: Arc<L>) -> LobbygateServer<L> {
        self.build_with_renderer(registry, CodecRenderer::new(JsonCodec))
    }

    /// Builds the server with a custom renderer.
    pub fn build_with_renderer<L: LobbyRegistry, R: Renderer>(
        self,
        registry: Arc<L>,
        renderer: R,
    ) -> LobbygateServer<L, R> {
        LobbygateServer {
            state: AppState {
                entry: Arc::new(LobbyEntry::new(registry, self.catalog, renderer)),
                config: Arc::new(self.config),
            },
        }
    }
}

impl Default for LobbygateServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A configured Lobbygate HTTP server.
///
/// Call [`run()`](Self::run) to start accepting requests, or take the
/// [`router()`](Self::router) and mount it yourself.
pub struct LobbygateServer<L: LobbyRegistry, R: Renderer = CodecRenderer<JsonCodec>> {
    state: AppState<L, R>,
}

impl LobbygateServer<InMemoryLobbyRegistry> {
    /// Creates a new builder.
    pub fn builder() -> LobbygateServerBuilder {
        LobbygateServerBuilder::new()
    }
}

impl<L: LobbyRegistry, R: Renderer> LobbygateServer<L, R> {
    /// The HTTP configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.state.config
    }

    /// The entry orchestrator behind the routes.
    pub fn entry(&self) -> &Arc<LobbyEntry<L, R>> {
        &self.state.entry
    }

    /// The axum router with both lobby routes.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/lobby/{id}", get(enter_lobby::<L, R>))
            .route("/lobby/{id}/players", get(list_players::<L, R>))
            .with_state(self.state.clone())
    }

    /// Binds to the configured address and serves until the process is
    /// terminated.
    ///
    /// # Errors
    /// Returns [`LobbygateError::Io`] if binding or serving fails.
    pub async fn run(self) -> Result<(), LobbygateError> {
        let listener = TcpListener::bind(&self.state.config.bind_addr).await?;
        self.serve(listener).await
    }

    /// Serves on an already-bound listener.
    ///
    /// # Errors
    /// Returns [`LobbygateError::Io`] if serving fails.
    pub async fn serve(self, listener: TcpListener) -> Result<(), LobbygateError> {
        tracing::info!(addr = %listener.local_addr()?, "Lobbygate server running");

        let app = self
            .router()
            .into_make_service_with_connect_info::<SocketAddr>();
        axum::serve(listener, app).await?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct EntryQuery {
    name: Option<String>,
}

/// GET /lobby/{id}
async fn enter_lobby<L: LobbyRegistry, R: Renderer>(
    State(state): State<AppState<L, R>>,
    Path(raw_id): Path<String>,
    Query(query): Query<EntryQuery>,
    SourceAddress(source_address): SourceAddress,
    headers: HeaderMap,
    jar: CookieJar,
) -> Response {
    let result = match LobbyId::parse(&raw_id) {
        Ok(lobby_id) => {
            let request = EntryRequest {
                lobby_id,
                credential: session_token(&jar, &state.config),
                source_address,
                user_agent: header_string(&headers, header::USER_AGENT),
                accept_language: header_string(&headers, header::ACCEPT_LANGUAGE),
                display_name: query
                    .name
                    .or_else(|| jar.get(USERNAME_COOKIE).map(|c| c.value().to_string())),
            };
            state.entry.enter_lobby(&request)
        }
        Err(_) => state.entry.not_found_page(),
    };

    match result {
        Ok(response) => entry_response(
            response,
            jar,
            &state.config,
            state.entry.renderer().content_type(),
        ),
        Err(LobbygateError::Render {
            source,
            credential: Some(token),
        }) => {
            tracing::error!(error = %source, "render failed after admission");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                jar.add(credential_cookie(&state.config, token)),
            )
                .into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// GET /lobby/{id}/players
async fn list_players<L: LobbyRegistry, R: Renderer>(
    State(state): State<AppState<L, R>>,
    Path(raw_id): Path<String>,
    jar: CookieJar,
) -> Result<Json<Vec<ParticipantView>>, LobbygateError> {
    let lobby_id = LobbyId::parse(&raw_id)
        .map_err(|_| LobbygateError::LobbyNotFound(LobbyId::new(raw_id.as_str())))?;
    let credential = session_token(&jar, &state.config);

    let participants = state
        .entry
        .list_participants(&lobby_id, credential.as_ref())?;
    Ok(Json(participants))
}

fn session_token(jar: &CookieJar, config: &ServerConfig) -> Option<SessionToken> {
    jar.get(&config.session_cookie)
        .map(|cookie| SessionToken::new(cookie.value()))
}

fn header_string(headers: &HeaderMap, name: HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(String::from)
}

/// Turns an entry response into HTTP.
///
/// The credential cookie is added only when one was issued. Otherwise
/// the jar is returned untouched, which sets no cookies.
fn entry_response(
    response: EntryResponse,
    jar: CookieJar,
    config: &ServerConfig,
    content_type: &'static str,
) -> Response {
    let jar = match response.credential {
        Some(token) => jar.add(credential_cookie(config, token)),
        None => jar,
    };

    let mut http = (
        status_for(response.outcome),
        jar,
        [(header::CONTENT_TYPE, content_type)],
        response.body,
    )
        .into_response();

    if let Some(value) = response
        .locale
        .and_then(|locale| HeaderValue::from_str(&locale).ok())
    {
        http.headers_mut().insert(header::CONTENT_LANGUAGE, value);
    }
    http
}

fn credential_cookie(config: &ServerConfig, token: SessionToken) -> Cookie<'static> {
    Cookie::build((config.session_cookie.clone(), token.expose().to_string()))
        .path("/")
        .same_site(SameSite::Strict)
        .build()
}

/// The HTTP status for each way a lobby entry can end.
pub fn status_for(outcome: EntryOutcome) -> StatusCode {
    match outcome {
        EntryOutcome::Degraded
        | EntryOutcome::Admitted(_)
        | EntryOutcome::Resumed(_) => StatusCode::OK,
        EntryOutcome::LobbyNotFound => StatusCode::NOT_FOUND,
        EntryOutcome::Rejected(Rejection::Full | Rejection::DuplicateSession) => {
            StatusCode::CONFLICT
        }
        EntryOutcome::Rejected(Rejection::QuotaExceeded) => StatusCode::TOO_MANY_REQUESTS,
    }
}

impl IntoResponse for LobbygateError {
    fn into_response(self) -> Response {
        match self {
            Self::LobbyNotFound(_) => (StatusCode::NOT_FOUND, self.to_string()).into_response(),
            Self::Unauthorized => (StatusCode::UNAUTHORIZED, self.to_string()).into_response(),
            // No partial output: the body stays empty.
            other => {
                tracing::error!(error = %other, "request failed");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Extractors
// ---------------------------------------------------------------------------

/// The request's resolved source address. See [`source_address`].
struct SourceAddress(IpAddr);

impl<L: LobbyRegistry, R: Renderer> FromRequestParts<AppState<L, R>> for SourceAddress {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState<L, R>,
    ) -> Result<Self, Self::Rejection> {
        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip());

        Ok(Self(source_address(
            &parts.headers,
            peer,
            state.config.trust_forwarded_for,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_for_each_outcome() {
        use lobbygate_protocol::ParticipantId;

        assert_eq!(status_for(EntryOutcome::Degraded), StatusCode::OK);
        assert_eq!(status_for(EntryOutcome::Admitted(ParticipantId(1))), StatusCode::OK);
        assert_eq!(status_for(EntryOutcome::Resumed(ParticipantId(1))), StatusCode::OK);
        assert_eq!(status_for(EntryOutcome::LobbyNotFound), StatusCode::NOT_FOUND);
        assert_eq!(
            status_for(EntryOutcome::Rejected(Rejection::Full)),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_for(EntryOutcome::Rejected(Rejection::DuplicateSession)),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_for(EntryOutcome::Rejected(Rejection::QuotaExceeded)),
            StatusCode::TOO_MANY_REQUESTS
        );
    }

    #[test]
    fn test_server_config_defaults() {
        let config = ServerConfig::default();

        assert_eq!(config.bind_addr, "127.0.0.1:8080");
        assert_eq!(config.session_cookie, "usersession");
        assert!(!config.trust_forwarded_for);
    }

    #[test]
    fn test_builder_applies_settings() {
        let server = LobbygateServer::builder()
            .bind("0.0.0.0:9000")
            .session_cookie("sid")
            .trust_forwarded_for(true)
            .build(Arc::new(InMemoryLobbyRegistry::new()));

        assert_eq!(server.config().bind_addr, "0.0.0.0:9000");
        assert_eq!(server.config().session_cookie, "sid");
        assert!(server.config().trust_forwarded_for);
    }
}
