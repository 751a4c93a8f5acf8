//! Locale negotiation for Lobbygate.
//!
//! Turns a raw `Accept-Language` header into the translation a page is
//! rendered with. Negotiation never fails: anything it can't make sense
//! of resolves to the catalog's default translation and `"en-us"`.
//!
//! - [`parse_accept_language`]: header → ordered [`LanguagePreference`]s
//! - [`TranslationCatalog`]: known translations plus the default
//! - [`TranslationCatalog::negotiate`]: header → [`LocaleResolution`]

mod accept;
mod catalog;
mod error;

pub use accept::{LanguagePreference, parse_accept_language};
pub use catalog::{
    DEFAULT_LOCALE, LocaleResolution, Translation, TranslationCatalog,
};
pub use error::LocaleError;
