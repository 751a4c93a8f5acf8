//! Page models handed to the [`Renderer`](crate::Renderer).
//!
//! These are the `data` half of each template. A custom renderer can
//! rely on their serialized shape.

use lobbygate_locale::Translation;
use lobbygate_protocol::{LobbyData, ParticipantId, ParticipantView};
use serde::Serialize;

/// Model for `robot-page`: public metadata only.
#[derive(Debug, Serialize)]
pub struct RobotPage {
    #[serde(flatten)]
    pub lobby: LobbyData,
}

/// Model for `lobby-page`.
#[derive(Debug, Serialize)]
pub struct LobbyPage<'a> {
    #[serde(flatten)]
    pub lobby: LobbyData,
    /// The participant this page is for.
    pub participant_id: ParticipantId,
    /// Everyone in the lobby, in admission order.
    pub participants: Vec<ParticipantView>,
    pub translation: &'a Translation,
    /// Canonical locale of `translation`, e.g. `"de"` or `"en-us"`.
    pub locale: &'a str,
}

/// Model for `error-page`.
#[derive(Debug, Serialize)]
pub struct ErrorPage<'a> {
    pub message: &'a str,
}
