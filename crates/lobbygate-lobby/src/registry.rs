//! The lobby registry: creates, tracks, and looks up lobbies by id.

use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use lobbygate_protocol::LobbyId;
use rand::Rng;

use crate::{Lobby, LobbyConfig, LobbyError};

/// Looks up lobbies by id.
///
/// This is the only thing the entry flow needs from "wherever lobbies
/// live". The server is handed an implementation at startup instead of
/// reaching for a global.
///
/// # Trait bounds
///
/// - `Send + Sync` → shared by every request handler task.
/// - `'static` → lives as long as the server.
pub trait LobbyRegistry: Send + Sync + 'static {
    /// Returns the lobby with this id, or `None` if there is none.
    fn lookup(&self, id: &LobbyId) -> Option<Arc<Lobby>>;
}

/// An in-process registry backed by a concurrent map.
///
/// Lookups for different lobbies don't contend: `DashMap` shards its
/// locks, and each lobby then has its own roster lock.
#[derive(Debug, Default)]
pub struct InMemoryLobbyRegistry {
    lobbies: DashMap<LobbyId, Arc<Lobby>>,
}

impl InMemoryLobbyRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a lobby with a fresh random id and registers it.
    pub fn create(&self, config: LobbyConfig) -> Arc<Lobby> {
        loop {
            let id = generate_lobby_id();
            // `entry` holds the shard lock, so the vacancy check and the
            // insert can't be split by another `create`.
            if let Entry::Vacant(slot) = self.lobbies.entry(id.clone()) {
                let lobby = Arc::new(Lobby::new(id.clone(), config));
                slot.insert(Arc::clone(&lobby));
                tracing::info!(
                    lobby_id = %id,
                    capacity = config.capacity,
                    per_address_quota = config.per_address_quota,
                    "lobby created"
                );
                return lobby;
            }
        }
    }

    /// Registers an existing lobby under its own id.
    ///
    /// # Errors
    /// Returns [`LobbyError::AlreadyExists`] if the id is taken.
    pub fn insert(&self, lobby: Lobby) -> Result<Arc<Lobby>, LobbyError> {
        let id = lobby.id().clone();
        match self.lobbies.entry(id.clone()) {
            Entry::Occupied(_) => Err(LobbyError::AlreadyExists(id)),
            Entry::Vacant(slot) => {
                let lobby = Arc::new(lobby);
                slot.insert(Arc::clone(&lobby));
                tracing::info!(lobby_id = %id, "lobby registered");
                Ok(lobby)
            }
        }
    }

    /// Tears a lobby down. Its participants and their tokens go with it.
    ///
    /// Requests already holding an `Arc<Lobby>` finish against the old
    /// instance; later lookups see nothing.
    pub fn remove(&self, id: &LobbyId) -> Option<Arc<Lobby>> {
        let removed = self.lobbies.remove(id).map(|(_, lobby)| lobby);
        if removed.is_some() {
            tracing::info!(lobby_id = %id, "lobby removed");
        }
        removed
    }

    /// Lists all registered lobby ids.
    pub fn ids(&self) -> Vec<LobbyId> {
        self.lobbies.iter().map(|entry| entry.key().clone()).collect()
    }

    /// Returns the number of registered lobbies.
    pub fn len(&self) -> usize {
        self.lobbies.len()
    }

    /// Returns `true` if no lobby is registered.
    pub fn is_empty(&self) -> bool {
        self.lobbies.is_empty()
    }
}

impl LobbyRegistry for InMemoryLobbyRegistry {
    fn lookup(&self, id: &LobbyId) -> Option<Arc<Lobby>> {
        self.lobbies.get(id).map(|entry| Arc::clone(entry.value()))
    }
}

/// Generates a random 16-character lowercase hex lobby id (64 bits).
fn generate_lobby_id() -> LobbyId {
    let bytes: [u8; 8] = rand::rng().random();
    LobbyId::new(bytes.iter().map(|b| format!("{b:02x}")).collect::<String>())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_registers_lobby_with_hex_id() {
        let registry = InMemoryLobbyRegistry::new();

        let lobby = registry.create(LobbyConfig::default());

        assert_eq!(lobby.id().as_str().len(), 16);
        assert!(lobby.id().as_str().chars().all(|c| c.is_ascii_hexdigit()));
        assert!(LobbyId::parse(lobby.id().as_str()).is_ok());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_lookup_returns_same_instance() {
        let registry = InMemoryLobbyRegistry::new();
        let lobby = registry.create(LobbyConfig::default());

        let found = registry.lookup(lobby.id()).expect("should exist");

        assert!(Arc::ptr_eq(&lobby, &found));
    }

    #[test]
    fn test_lookup_unknown_returns_none() {
        let registry = InMemoryLobbyRegistry::new();

        assert!(registry.lookup(&LobbyId::new("missing")).is_none());
    }

    #[test]
    fn test_insert_duplicate_id_returns_already_exists() {
        let registry = InMemoryLobbyRegistry::new();
        registry
            .insert(Lobby::new(LobbyId::new("fixed"), LobbyConfig::default()))
            .unwrap();

        let result = registry
            .insert(Lobby::new(LobbyId::new("fixed"), LobbyConfig::default()));

        assert!(matches!(result, Err(LobbyError::AlreadyExists(_))));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_remove_tears_lobby_down() {
        let registry = InMemoryLobbyRegistry::new();
        let lobby = registry.create(LobbyConfig::default());
        let id = lobby.id().clone();

        assert!(registry.remove(&id).is_some());
        assert!(registry.lookup(&id).is_none());
        assert!(registry.remove(&id).is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_ids_lists_every_lobby() {
        let registry = InMemoryLobbyRegistry::new();
        let a = registry.create(LobbyConfig::default());
        let b = registry.create(LobbyConfig::default());

        let mut ids = registry.ids();
        ids.sort_by(|x, y| x.as_str().cmp(y.as_str()));
        let mut expected = vec![a.id().clone(), b.id().clone()];
        expected.sort_by(|x, y| x.as_str().cmp(y.as_str()));

        assert_eq!(ids, expected);
    }
}
