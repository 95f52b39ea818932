//! Address token extraction and parsing
//!
//! The whole request path is one address expression: it is split on `/`,
//! empty segments are dropped, and the last remaining segment is the
//! candidate token. This keeps IPv6 literals (which contain `:`) intact no
//! matter how many slashes precede them.

use std::net::IpAddr;

use super::error::LookupError;

/// Return the last non-empty `/`-separated segment of `path`
pub fn extract_token(path: &str) -> Result<&str, LookupError> {
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .next_back()
        .ok_or_else(|| LookupError::Extraction {
            path: path.to_string(),
        })
}

/// Parse a candidate token as a textual IPv4 or IPv6 address
///
/// Zone identifiers, hostnames, partial addresses and trailing garbage are
/// all rejected. IPv4-mapped IPv6 literals (`::ffff:a.b.c.d`) resolve to
/// the plain IPv4 address.
pub fn parse_address(token: &str) -> Result<IpAddr, LookupError> {
    token
        .parse::<IpAddr>()
        .map(|ip| ip.to_canonical())
        .map_err(|source| LookupError::Parse {
            token: token.to_string(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_single_segment() {
        assert_eq!(extract_token("/203.0.113.5").unwrap(), "203.0.113.5");
    }

    #[test]
    fn test_extract_ignores_repeated_slashes() {
        assert_eq!(extract_token("//203.0.113.5").unwrap(), "203.0.113.5");
        assert_eq!(extract_token("/203.0.113.5/").unwrap(), "203.0.113.5");
        assert_eq!(extract_token("//2001:db8::1").unwrap(), "2001:db8::1");
    }

    #[test]
    fn test_extract_last_segment_wins() {
        assert_eq!(extract_token("/x/203.0.113.5").unwrap(), "203.0.113.5");
        assert_eq!(extract_token("/a/b//c/2001:db8::1").unwrap(), "2001:db8::1");
    }

    #[test]
    fn test_extract_without_segments_fails() {
        for path in ["", "/", "///"] {
            let err = extract_token(path).unwrap_err();
            assert!(matches!(err, LookupError::Extraction { .. }), "{path:?}");
        }
    }

    #[test]
    fn test_parse_ipv4() {
        let ip = parse_address("203.0.113.5").unwrap();
        assert!(ip.is_ipv4());
        assert_eq!(ip.to_string(), "203.0.113.5");
    }

    #[test]
    fn test_parse_ipv6_forms() {
        for token in ["2001:db8::1", "::1", "::", "fe80::1:2:3:4", "64:ff9b::192.0.2.1"] {
            let ip = parse_address(token).unwrap();
            assert!(ip.is_ipv6(), "{token}");
        }
    }

    #[test]
    fn test_ipv4_mapped_parses_as_ipv4() {
        let ip = parse_address("::ffff:192.0.2.1").unwrap();
        assert!(ip.is_ipv4());
        assert_eq!(ip.to_string(), "192.0.2.1");
    }

    #[test]
    fn test_ipv6_rendering_is_canonical_and_reparses() {
        let ip = parse_address("2001:0DB8:0:0:0:0:0:0001").unwrap();
        let rendered = ip.to_string();
        assert_eq!(rendered, "2001:db8::1");
        assert_eq!(parse_address(&rendered).unwrap(), ip);
    }

    #[test]
    fn test_parse_rejects_non_addresses() {
        for token in [
            "not-an-ip",
            "example.com",
            "203.0.113",
            "203.0.113.5.6",
            "256.0.0.1",
            "203.0.113.5x",
            "2001:db8::1::2",
            "fe80::1%eth0",
            "[::1]",
            "203.0.113.5:80",
        ] {
            let err = parse_address(token).unwrap_err();
            assert!(matches!(err, LookupError::Parse { .. }), "{token}");
        }
    }

    #[test]
    fn test_parse_error_message_names_token() {
        let err = parse_address("not-an-ip").unwrap_err();
        assert_eq!(err.to_string(), "'not-an-ip' is not an IP string literal.");
    }
}
