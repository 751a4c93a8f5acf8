//! Lobby configuration.

use serde::{Deserialize, Serialize};

/// Limits attached to a lobby when it is created. Read-only afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LobbyConfig {
    /// Maximum number of participants, connected or not.
    pub capacity: usize,

    /// Maximum number of participants whose last-known address is the
    /// same. Stops one machine from filling a lobby with tabs.
    pub per_address_quota: usize,
}

impl LobbyConfig {
    /// Returns `true` if a lobby with `participant_count` participants
    /// can take one more.
    pub fn has_free_slot(&self, participant_count: usize) -> bool {
        participant_count < self.capacity
    }
}

impl Default for LobbyConfig {
    fn default() -> Self {
        Self {
            capacity: 12,
            per_address_quota: 1,
        }
    }
}
