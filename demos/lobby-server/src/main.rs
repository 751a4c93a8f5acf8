//! A runnable Lobbygate server with one sample lobby.
//!
//! ```text
//! LOBBYGATE_BIND=0.0.0.0:8080 RUST_LOG=lobbygate=debug cargo run -p lobby-server
//! ```
//!
//! Then open `http://<bind>/lobby/demo` in a browser, or
//! `curl http://<bind>/lobby/demo` to see what a crawler gets.
//!
//! Set `LOBBYGATE_TRUST_PROXY=1` when running behind a reverse proxy that
//! sets `X-Forwarded-For`. Without a proxy, leave it unset: clients could
//! otherwise pick their own address and dodge the per-address quota.

use lobbygate::prelude::*;
use tracing_subscriber::EnvFilter;

/// Id of the lobby that always exists.
const DEMO_LOBBY: &str = "demo";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let bind = std::env::var("LOBBYGATE_BIND").unwrap_or_else(|_| "127.0.0.1:8080".to_string());
    let trust_proxy = std::env::var("LOBBYGATE_TRUST_PROXY").is_ok_and(|v| v == "1" || v == "true");

    let registry = Arc::new(InMemoryLobbyRegistry::new());
    registry.insert(Lobby::new(
        LobbyId::parse(DEMO_LOBBY)?,
        LobbyConfig {
            capacity: 4,
            per_address_quota: 2,
        },
    ))?;
    let random = registry.create(LobbyConfig::default());

    tracing::info!(%bind, "open http://{bind}/lobby/{DEMO_LOBBY} or http://{bind}/lobby/{}", random.id());

    LobbygateServer::builder()
        .bind(&bind)
        .trust_forwarded_for(trust_proxy)
        .build(registry)
        .run()
        .await?;
    Ok(())
}
