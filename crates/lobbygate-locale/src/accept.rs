//! `Accept-Language` header parsing.
//!
//! ```text
//! Accept-Language: de-AT, de;q=0.9, en;q=0.5, *;q=0.1
//! ```
//!
//! Each comma-separated entry is a language tag with an optional quality
//! weight (default 1). Entries come back ordered by weight, highest
//! first; entries with equal weight keep their header order.

use crate::LocaleError;

/// Headers with more subtag separators than this are refused outright.
const MAX_SEPARATORS: usize = 1000;

/// One entry of an `Accept-Language` header.
#[derive(Debug, Clone, PartialEq)]
pub struct LanguagePreference {
    /// The full tag, lowercased, with `-` separators (`"de-at"`).
    pub tag: String,
    /// The primary language subtag, lowercased (`"de"`).
    pub base: String,
    /// Quality weight in `(0, 1]`.
    pub weight: f32,
}

/// Parses an `Accept-Language` header value.
///
/// - Empty entries are skipped; an empty header yields an empty list.
/// - `_` is accepted as a subtag separator (`en_US` → `en-us`).
/// - The `*` wildcard is accepted and dropped (it names no translation).
/// - Entries weighted `q=0` are dropped.
///
/// # Errors
/// Any malformed tag or weight fails the whole header.
pub fn parse_accept_language(
    header: &str,
) -> Result<Vec<LanguagePreference>, LocaleError> {
    if header.matches('-').count() > MAX_SEPARATORS {
        return Err(LocaleError::TooLarge);
    }

    let mut preferences = Vec::new();
    for entry in header.split(',') {
        let entry = entry.trim();
        if entry.is_empty() {
            continue;
        }

        let (tag, weight) = match entry.split_once(';') {
            Some((tag, weight)) => (tag.trim(), Some(weight.trim())),
            None => (entry, None),
        };

        let weight = match weight {
            Some(raw) => parse_weight(raw)?,
            None => 1.0,
        };
        if tag == "*" {
            continue;
        }
        let (tag, base) = normalize_tag(tag)?;
        if weight <= 0.0 {
            continue;
        }

        preferences.push(LanguagePreference { tag, base, weight });
    }

    // `sort_by` is stable: equal weights keep header order.
    preferences.sort_by(|a, b| b.weight.total_cmp(&a.weight));
    Ok(preferences)
}

/// Parses `q=<float>`, tolerating whitespace around `=`.
fn parse_weight(raw: &str) -> Result<f32, LocaleError> {
    let invalid = || LocaleError::InvalidWeight(raw.to_string());

    let value = raw
        .strip_prefix('q')
        .map(str::trim_start)
        .and_then(|rest| rest.strip_prefix('='))
        .map(str::trim)
        .ok_or_else(invalid)?;

    let weight: f32 = value.parse().map_err(|_| invalid())?;
    if !(0.0..=1.0).contains(&weight) {
        return Err(invalid());
    }
    Ok(weight)
}

/// Validates a tag and returns `(full, base)`, both lowercased.
///
/// Primary subtag: 2-8 letters. Every further subtag: 1-8 letters or
/// digits.
fn normalize_tag(raw: &str) -> Result<(String, String), LocaleError> {
    let invalid = || LocaleError::InvalidTag(raw.to_string());

    let mut subtags = raw.split(['-', '_']);
    let primary = subtags.next().ok_or_else(invalid)?;
    if !(2..=8).contains(&primary.len())
        || !primary.chars().all(|c| c.is_ascii_alphabetic())
    {
        return Err(invalid());
    }

    let base = primary.to_ascii_lowercase();
    let mut full = base.clone();
    for subtag in subtags {
        if !(1..=8).contains(&subtag.len())
            || !subtag.chars().all(|c| c.is_ascii_alphanumeric())
        {
            return Err(invalid());
        }
        full.push('-');
        full.push_str(&subtag.to_ascii_lowercase());
    }

    Ok((full, base))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(header: &str) -> Vec<String> {
        parse_accept_language(header)
            .expect("should parse")
            .into_iter()
            .map(|p| p.tag)
            .collect()
    }

    #[test]
    fn test_parse_single_tag_defaults_to_full_weight() {
        let prefs = parse_accept_language("de-AT").unwrap();
        assert_eq!(prefs.len(), 1);
        assert_eq!(prefs[0].tag, "de-at");
        assert_eq!(prefs[0].base, "de");
        assert_eq!(prefs[0].weight, 1.0);
    }

    #[test]
    fn test_parse_orders_by_weight_descending() {
        assert_eq!(
            tags("en;q=0.5, de-AT, de;q=0.9"),
            vec!["de-at", "de", "en"]
        );
    }

    #[test]
    fn test_parse_equal_weights_keep_header_order() {
        assert_eq!(tags("fr, de, en"), vec!["fr", "de", "en"]);
        assert_eq!(tags("fr;q=0.5, de;q=0.5"), vec!["fr", "de"]);
    }

    #[test]
    fn test_parse_empty_header_returns_empty_list() {
        assert!(parse_accept_language("").unwrap().is_empty());
        assert!(parse_accept_language(" , ,").unwrap().is_empty());
    }

    #[test]
    fn test_parse_drops_wildcard_and_zero_weight() {
        assert_eq!(tags("*;q=0.1, fr;q=0, en"), vec!["en"]);
    }

    #[test]
    fn test_parse_accepts_underscore_separator() {
        assert_eq!(tags("en_US"), vec!["en-us"]);
    }

    #[test]
    fn test_parse_tolerates_spaces_in_weight() {
        assert_eq!(tags("de ; q = 0.3, en"), vec!["en", "de"]);
    }

    #[test]
    fn test_parse_malformed_tag_fails_whole_header() {
        assert!(matches!(
            parse_accept_language("en, d€, fr"),
            Err(LocaleError::InvalidTag(_))
        ));
        assert!(parse_accept_language("e").is_err());
        assert!(parse_accept_language("en--us").is_err());
        assert!(parse_accept_language("toolongprimary").is_err());
    }

    #[test]
    fn test_parse_malformed_weight_fails_whole_header() {
        assert!(matches!(
            parse_accept_language("en;q=abc"),
            Err(LocaleError::InvalidWeight(_))
        ));
        assert!(parse_accept_language("en;x=0.5").is_err());
        assert!(parse_accept_language("en;q=1.5").is_err());
        assert!(parse_accept_language("en;q=").is_err());
    }

    #[test]
    fn test_parse_too_many_separators_is_rejected() {
        let header = "a".to_string() + &"-a".repeat(MAX_SEPARATORS + 1);
        assert_eq!(parse_accept_language(&header), Err(LocaleError::TooLarge));
    }
}
