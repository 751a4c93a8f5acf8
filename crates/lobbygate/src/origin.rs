//! Working out which address a request really came from.
//!
//! Behind a reverse proxy the socket peer is the proxy. The per-address
//! quota must count the client behind it, so forwarding headers win
//! when they are trusted.

use std::net::{IpAddr, Ipv4Addr};

use axum::http::HeaderMap;

/// Resolves a request's source address.
///
/// With `trust_forwarded` set, tries in order:
/// 1. the first entry of `X-Forwarded-For`
/// 2. `X-Real-IP`
///
/// then falls back to `peer`. Unparseable header values are skipped.
/// With no usable address at all, returns `0.0.0.0`, so every such
/// request shares one quota bucket.
pub fn source_address(
    headers: &HeaderMap,
    peer: Option<IpAddr>,
    trust_forwarded: bool,
) -> IpAddr {
    if trust_forwarded {
        let forwarded = header_str(headers, "x-forwarded-for")
            .and_then(|value| value.split(',').next())
            .and_then(parse_ip);
        let real = header_str(headers, "x-real-ip").and_then(parse_ip);
        if let Some(address) = forwarded.or(real) {
            return address;
        }
    }

    peer.unwrap_or_else(|| {
        tracing::debug!("no source address available, using 0.0.0.0");
        IpAddr::V4(Ipv4Addr::UNSPECIFIED)
    })
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

fn parse_ip(raw: &str) -> Option<IpAddr> {
    raw.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use std::net::Ipv6Addr;

    use axum::http::HeaderValue;

    use super::*;

    fn peer() -> Option<IpAddr> {
        Some(IpAddr::V4(Ipv4Addr::new(192, 168, 1, 1)))
    }

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(*name, HeaderValue::from_static(*value));
        }
        map
    }

    #[test]
    fn test_source_address_uses_first_forwarded_entry() {
        let h = headers(&[("x-forwarded-for", "203.0.113.7, 10.0.0.1")]);

        assert_eq!(
            source_address(&h, peer(), true),
            IpAddr::V4(Ipv4Addr::new(203, 0, 113, 7))
        );
    }

    #[test]
    fn test_source_address_falls_back_to_real_ip() {
        let h = headers(&[("x-real-ip", "2001:db8::1")]);

        assert_eq!(
            source_address(&h, peer(), true),
            IpAddr::V6("2001:db8::1".parse::<Ipv6Addr>().unwrap())
        );
    }

    #[test]
    fn test_source_address_skips_garbage_forwarded_value() {
        let h = headers(&[("x-forwarded-for", "unknown"), ("x-real-ip", "198.51.100.2")]);

        assert_eq!(
            source_address(&h, peer(), true),
            IpAddr::V4(Ipv4Addr::new(198, 51, 100, 2))
        );
    }

    #[test]
    fn test_source_address_untrusted_headers_use_peer() {
        let h = headers(&[("x-forwarded-for", "203.0.113.7")]);

        assert_eq!(source_address(&h, peer(), false), peer().unwrap());
    }

    #[test]
    fn test_source_address_nothing_available_is_unspecified() {
        assert_eq!(
            source_address(&HeaderMap::new(), None, true),
            IpAddr::V4(Ipv4Addr::UNSPECIFIED)
        );
    }
}
