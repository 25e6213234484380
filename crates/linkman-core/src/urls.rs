//! URL parsing, validation and source extraction
//!
//! A link's URL must be absolute and carry a host. Its "source" is the
//! registrable domain label of that host, e.g.:
//!
//! | url                   | source        |
//! | --------------------- | ------------- |
//! | www.youtube.com       | youtube       |
//! | stackoverflow.com     | stackoverflow |
//! | www.domain.co.uk      | domain        |
//!
//! Public suffixes are resolved against the list bundled with the `psl`
//! crate, so no network access is involved.

use std::net::IpAddr;

use thiserror::Error;
use url::{Host, Url};

/// Errors produced while parsing a URL or deriving its source
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UrlError {
    /// The string could not be parsed as a URL
    #[error("Invalid URL '{input}': {source}")]
    InvalidUrl {
        input: String,
        #[source]
        source: url::ParseError,
    },

    /// The URL has no host component
    #[error("Unexpected URL '{url}': missing hostname")]
    MissingHost { url: String },

    /// The host cannot be matched against the public suffix list
    #[error("Malformed host '{host}': {reason}")]
    MalformedHost { host: String, reason: &'static str },
}

pub type UrlResult<T> = Result<T, UrlError>;

type Validator = fn(&Url) -> UrlResult<()>;

/// Checks every parsed URL must pass, in order
const VALIDATORS: &[Validator] = &[validate_host];

/// Parse a raw string into a validated absolute URL
pub fn parse_url(raw: &str) -> UrlResult<Url> {
    let url = Url::parse(raw.trim()).map_err(|source| match source {
        // A scheme-less string like "example.com/page" is a path, not a host
        url::ParseError::RelativeUrlWithoutBase | url::ParseError::EmptyHost => {
            UrlError::MissingHost {
                url: raw.to_string(),
            }
        }
        _ => UrlError::InvalidUrl {
            input: raw.to_string(),
            source,
        },
    })?;

    validate(&url)?;
    Ok(url)
}

/// Compute the source label for a URL
pub fn source_of(url: &Url) -> UrlResult<String> {
    validate(url)?;

    match url.host() {
        Some(Host::Domain(domain)) => extract_source(domain),
        Some(Host::Ipv4(addr)) => Err(ip_host(addr.to_string())),
        Some(Host::Ipv6(addr)) => Err(ip_host(addr.to_string())),
        None => Err(UrlError::MissingHost {
            url: url.to_string(),
        }),
    }
}

/// Compute the source label for a hostname
///
/// Takes the effective TLD plus one label and strips the public suffix
/// together with the joining dot.
pub fn extract_source(hostname: &str) -> UrlResult<String> {
    let host = hostname.trim().trim_end_matches('.').to_ascii_lowercase();

    if host.is_empty() {
        return Err(malformed(hostname, "hostname is empty"));
    }

    let unbracketed = host.trim_start_matches('[').trim_end_matches(']');
    if unbracketed.parse::<IpAddr>().is_ok() {
        return Err(ip_host(hostname.to_string()));
    }

    if host.split('.').any(str::is_empty) {
        return Err(malformed(hostname, "hostname contains an empty label"));
    }

    let domain = psl::domain_str(&host)
        .ok_or_else(|| malformed(hostname, "hostname has no registrable domain"))?;
    let suffix = psl::suffix_str(domain)
        .ok_or_else(|| malformed(hostname, "hostname has no public suffix"))?;

    domain
        .strip_suffix(suffix)
        .and_then(|label| label.strip_suffix('.'))
        .filter(|label| !label.is_empty())
        .map(str::to_string)
        .ok_or_else(|| malformed(hostname, "hostname has no registrable domain"))
}

fn validate(url: &Url) -> UrlResult<()> {
    VALIDATORS.iter().try_for_each(|check| check(url))
}

fn validate_host(url: &Url) -> UrlResult<()> {
    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(()),
        _ => Err(UrlError::MissingHost {
            url: url.to_string(),
        }),
    }
}

fn malformed(host: &str, reason: &'static str) -> UrlError {
    UrlError::MalformedHost {
        host: host.to_string(),
        reason,
    }
}

fn ip_host(host: String) -> UrlError {
    UrlError::MalformedHost {
        host,
        reason: "IP addresses have no registrable domain",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_source_examples() {
        assert_eq!(extract_source("www.youtube.com").unwrap(), "youtube");
        assert_eq!(extract_source("youtube.com").unwrap(), "youtube");
        assert_eq!(extract_source("stackoverflow.com").unwrap(), "stackoverflow");
        assert_eq!(extract_source("www.domain.co.uk").unwrap(), "domain");
        assert_eq!(extract_source("domain.co.uk").unwrap(), "domain");
    }

    #[test]
    fn test_extract_source_deep_subdomain() {
        assert_eq!(extract_source("a.b.example.com").unwrap(), "example");
        assert_eq!(extract_source("en.m.wikipedia.org").unwrap(), "wikipedia");
    }

    #[test]
    fn test_extract_source_normalizes_host() {
        assert_eq!(extract_source("WWW.Example.COM").unwrap(), "example");
        assert_eq!(extract_source("www.example.com.").unwrap(), "example");
    }

    #[test]
    fn test_extract_source_failures() {
        for host in ["", "com", "co.uk", "localhost", "127.0.0.1", "[::1]", "a..com"] {
            let err = extract_source(host).unwrap_err();
            assert!(
                matches!(err, UrlError::MalformedHost { .. }),
                "expected MalformedHost for {:?}, got {:?}",
                host,
                err
            );
        }
    }

    #[test]
    fn test_parse_url_round_trip() {
        for raw in [
            "https://www.wikipedia.org/",
            "http://example.com/path/to/page?q=rust&page=2",
            "https://sub.domain.co.uk:8443/a?b=c",
        ] {
            let url = parse_url(raw).unwrap();
            let reparsed = parse_url(url.as_str()).unwrap();
            assert_eq!(reparsed, url);
            assert_eq!(reparsed.scheme(), url.scheme());
            assert_eq!(reparsed.host_str(), url.host_str());
            assert_eq!(reparsed.path(), url.path());
            assert_eq!(reparsed.query(), url.query());
        }
    }

    #[test]
    fn test_parse_url_invalid() {
        let err = parse_url("http://exa mple.com").unwrap_err();
        assert!(matches!(err, UrlError::InvalidUrl { .. }));
    }

    #[test]
    fn test_parse_url_missing_host() {
        for raw in ["example.com/page", "/just/a/path", "mailto:someone@example.com"] {
            let err = parse_url(raw).unwrap_err();
            assert!(
                matches!(err, UrlError::MissingHost { .. }),
                "expected MissingHost for {:?}, got {:?}",
                raw,
                err
            );
        }
    }

    #[test]
    fn test_source_of_url() {
        let url = parse_url("https://www.youtube.com/watch?v=abc").unwrap();
        assert_eq!(source_of(&url).unwrap(), "youtube");
    }

    #[test]
    fn test_source_of_ip_url() {
        let url = parse_url("http://192.168.1.10:8080/admin").unwrap();
        let err = source_of(&url).unwrap_err();
        assert!(matches!(err, UrlError::MalformedHost { .. }));
    }

    #[test]
    fn test_error_display() {
        let err = parse_url("nothost").unwrap_err();
        assert!(err.to_string().contains("missing hostname"));
    }
}
