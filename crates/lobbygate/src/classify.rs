//! Telling browsers apart from crawlers.

/// Substrings of a `User-Agent` that mark a real browser engine.
const BROWSER_ENGINES: [&str; 4] = ["gecko", "chrome", "opera", "safari"];

/// What kind of client sent a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientKind {
    /// A browser a person is sitting in front of. Gets the full entry
    /// flow: admission, a session token, the lobby page.
    Interactive,

    /// A crawler, link-preview bot, or script. Gets the public lobby
    /// metadata and nothing else: no admission, no token.
    NonInteractive,
}

/// Classifies a client by its `User-Agent`, case-insensitively.
///
/// A missing header classifies as [`ClientKind::NonInteractive`].
pub fn classify(user_agent: Option<&str>) -> ClientKind {
    let Some(user_agent) = user_agent else {
        return ClientKind::NonInteractive;
    };

    let user_agent = user_agent.to_ascii_lowercase();
    if BROWSER_ENGINES
        .iter()
        .any(|engine| user_agent.contains(engine))
    {
        ClientKind::Interactive
    } else {
        ClientKind::NonInteractive
    }
}
