//! Validation of caller-supplied URLs, identifiers and CLI arguments.
//!
//! Everything here runs before a subprocess is spawned, so a rejected value
//! never reaches the Screaming Frog command line.

use crate::error::{SpiderError, SpiderResult};
use regex::Regex;
use std::net::{IpAddr, Ipv4Addr};
use std::sync::LazyLock;
use url::Url;

/// Hostnames that resolve to cloud metadata or the local machine
const BLOCKED_HOSTNAMES: &[&str] = &["localhost", "metadata.google.internal", "metadata.internal"];

static CRAWL_ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_.\-]+$").expect("static crawl id pattern"));

/// Validate a crawl seed URL and return it parsed.
///
/// Accepts only http/https URLs with a hostname. Loopback, private and
/// link-local IP literals are rejected, as are `localhost` and the well-known
/// cloud metadata hostnames.
pub fn validate_crawl_url(raw: &str) -> SpiderResult<Url> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(SpiderError::InvalidArgument("url must not be empty".to_string()));
    }

    let url = Url::parse(trimmed)
        .map_err(|e| SpiderError::InvalidArgument(format!("Invalid URL '{raw}': {e}")))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(SpiderError::InvalidArgument(format!(
            "Only http/https URLs are allowed, got: {}",
            url.scheme()
        )));
    }

    let host = match url.host() {
        Some(host) => host,
        None => {
            return Err(SpiderError::InvalidArgument(format!(
                "URL '{raw}' must include a hostname"
            )));
        }
    };

    match host {
        url::Host::Ipv4(ip) => reject_internal_ip(IpAddr::V4(ip))?,
        url::Host::Ipv6(ip) => reject_internal_ip(IpAddr::V6(ip))?,
        url::Host::Domain(domain) => {
            let lowered = domain.to_ascii_lowercase();
            if BLOCKED_HOSTNAMES.contains(&lowered.as_str()) {
                return Err(SpiderError::InvalidArgument(format!(
                    "Blocked hostname: {domain}"
                )));
            }
        }
    }

    Ok(url)
}

fn reject_internal_ip(ip: IpAddr) -> SpiderResult<()> {
    if is_internal_ip(ip) {
        return Err(SpiderError::InvalidArgument(format!(
            "Internal/private addresses are not allowed: {ip}"
        )));
    }
    Ok(())
}

fn is_internal_v4(v4: Ipv4Addr) -> bool {
    let [first, second, ..] = v4.octets();
    v4.is_private()
        || v4.is_loopback()
        || v4.is_link_local()
        || v4.is_unspecified()
        || v4.is_broadcast()
        // 0.0.0.0/8 "this network"
        || first == 0
        // 100.64.0.0/10 carrier-grade NAT
        || (first == 100 && (second & 0xc0) == 64)
}

fn is_internal_ip(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => is_internal_v4(v4),
        IpAddr::V6(v6) => {
            // ::ffff:a.b.c.d reaches the IPv4 host
            if let Some(v4) = v6.to_ipv4_mapped() {
                return is_internal_v4(v4);
            }
            let segments = v6.segments();
            v6.is_loopback()
                || v6.is_unspecified()
                // fc00::/7 unique local, fe80::/10 link local
                || (segments[0] & 0xfe00) == 0xfc00
                || (segments[0] & 0xffc0) == 0xfe80
        }
    }
}

/// Reject values that would be parsed as a CLI flag
pub fn validate_cli_arg(value: &str, name: &str) -> SpiderResult<()> {
    if value.trim_start().starts_with('-') {
        return Err(SpiderError::InvalidArgument(format!(
            "{name} must not start with '-'"
        )));
    }
    Ok(())
}

/// Validate a crawl database identifier.
///
/// Ids become path components under the database directory and a CLI
/// argument, so only `[A-Za-z0-9_.-]` is accepted, never a leading `-`, and
/// never `.` or `..`.
pub fn validate_crawl_id(crawl_id: &str) -> SpiderResult<()> {
    validate_cli_arg(crawl_id, "crawl_id")?;
    if crawl_id == "." || crawl_id == ".." {
        return Err(SpiderError::InvalidArgument(format!(
            "crawl_id '{crawl_id}' is not a valid identifier"
        )));
    }
    if !CRAWL_ID_PATTERN.is_match(crawl_id) {
        return Err(SpiderError::InvalidArgument(format!(
            "crawl_id '{crawl_id}' contains invalid characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mapped_and_reserved_ranges_are_internal() {
        for raw in [
            "::ffff:127.0.0.1",
            "::ffff:169.254.169.254",
            "::ffff:10.0.0.1",
            "100.64.0.1",
            "100.127.255.254",
            "0.1.2.3",
            "255.255.255.255",
        ] {
            let ip: IpAddr = raw.parse().unwrap();
            assert!(is_internal_ip(ip), "{raw}");
        }
    }

    #[test]
    fn public_addresses_pass() {
        for raw in ["93.184.216.34", "100.63.255.255", "100.128.0.1", "::ffff:93.184.216.34", "2606:4700::1111"] {
            let ip: IpAddr = raw.parse().unwrap();
            assert!(!is_internal_ip(ip), "{raw}");
        }
    }
}
