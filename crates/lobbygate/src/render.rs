//! The rendering seam and its default, codec-backed implementation.
//!
//! The entry flow never builds HTML itself. It hands a [`Template`] name
//! and a serializable page model to a [`Renderer`] and gets bytes back.
//! Swap in a real template engine by implementing the trait.

use lobbygate_protocol::{Codec, ProtocolError};
use serde::Serialize;

/// The pages the entry flow can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Template {
    /// Public lobby metadata for non-interactive clients.
    RobotPage,
    /// The full lobby page for an admitted or returning participant.
    LobbyPage,
    /// A user-facing error message.
    ErrorPage,
}

impl Template {
    /// The template's name as a template engine knows it.
    pub fn name(self) -> &'static str {
        match self {
            Self::RobotPage => "robot-page",
            Self::LobbyPage => "lobby-page",
            Self::ErrorPage => "error-page",
        }
    }
}

impl std::fmt::Display for Template {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Errors from a [`Renderer`].
///
/// A render failure is fatal for the request that hit it: the HTTP
/// adapter answers with an empty `500` rather than partial output.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// The page model couldn't be encoded.
    #[error("failed to encode {template}: {source}")]
    Encode {
        template: Template,
        #[source]
        source: ProtocolError,
    },

    /// The template engine failed.
    #[error("failed to render {template}: {reason}")]
    Template { template: Template, reason: String },
}

/// Turns a template name plus page model into response bytes.
///
/// # Trait bounds
///
/// - `Send + Sync` → called from every request handler concurrently.
/// - `'static` → stored in long-lived server state.
pub trait Renderer: Send + Sync + 'static {
    /// Renders `template` with `data`.
    ///
    /// # Errors
    /// Returns a [`RenderError`] if the page can't be produced. No bytes
    /// are returned in that case.
    fn render<T: Serialize>(
        &self,
        template: Template,
        data: &T,
    ) -> Result<Vec<u8>, RenderError>;

    /// The `Content-Type` of rendered pages.
    fn content_type(&self) -> &'static str;
}

/// A [`Renderer`] that encodes `{"template": <name>, "data": <model>}`
/// with a [`Codec`].
///
/// With [`JsonCodec`](lobbygate_protocol::JsonCodec) this is a
/// machine-readable page API that a single-page frontend fetches and
/// renders client-side.
#[derive(Debug, Clone, Default)]
pub struct CodecRenderer<C: Codec> {
    codec: C,
}

impl<C: Codec> CodecRenderer<C> {
    /// Creates a renderer around `codec`.
    pub fn new(codec: C) -> Self {
        Self { codec }
    }
}

#[derive(Serialize)]
struct Rendered<'a, T: Serialize> {
    template: &'static str,
    data: &'a T,
}

impl<C: Codec> Renderer for CodecRenderer<C> {
    fn render<T: Serialize>(
        &self,
        template: Template,
        data: &T,
    ) -> Result<Vec<u8>, RenderError> {
        let page = Rendered {
            template: template.name(),
            data,
        };
        self.codec
            .encode(&page)
            .map_err(|source| RenderError::Encode { template, source })
    }

    fn content_type(&self) -> &'static str {
        self.codec.content_type()
    }
}

#[cfg(test)]
mod tests {
    use lobbygate_protocol::JsonCodec;

    use super::*;

    #[test]
    fn test_template_names() {
        assert_eq!(Template::RobotPage.name(), "robot-page");
        assert_eq!(Template::LobbyPage.name(), "lobby-page");
        assert_eq!(Template::ErrorPage.to_string(), "error-page");
    }

    #[test]
    fn test_codec_renderer_wraps_template_and_data() {
        let renderer = CodecRenderer::new(JsonCodec);

        let bytes = renderer
            .render(Template::ErrorPage, &serde_json::json!({"message": "hi"}))
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(value["template"], "error-page");
        assert_eq!(value["data"]["message"], "hi");
        assert_eq!(renderer.content_type(), "application/json");
    }

    #[test]
    fn test_codec_renderer_encode_failure_is_render_error() {
        // JSON object keys must be strings.
        let mut bad = std::collections::HashMap::new();
        bad.insert(vec![1u8], 1);

        let result = CodecRenderer::new(JsonCodec).render(Template::LobbyPage, &bad);

        assert!(matches!(
            result,
            Err(RenderError::Encode {
                template: Template::LobbyPage,
                ..
            })
        ));
    }
}
