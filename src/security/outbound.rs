//! Pre-call validation for operations that touch the local disk or fetch a
//! caller-supplied URL.
//!
//! The URL guard inspects the parsed host: IP literals (including IPv4-mapped
//! IPv6) are classified by address, names are matched against a blocklist
//! after dropping a trailing root dot. It does not resolve DNS, so a public
//! name that resolves to a private address at request time is not caught.

use crate::error::{Result, XError};
use std::net::{Ipv4Addr, Ipv6Addr};
use url::{Host, Url};

/// Names that always point back at this machine or a cloud metadata service.
const BLOCKED_NAMES: &[&str] = &["localhost", "metadata.google.internal"];

const METADATA_V4: Ipv4Addr = Ipv4Addr::new(169, 254, 169, 254);

/// Reject any path containing a parent-directory component marker.
pub fn validate_path(path: &str) -> Result<()> {
    if path.contains("..") {
        return Err(XError::PathTraversal);
    }
    Ok(())
}

/// Reject non-http(s) URLs and URLs aimed at loopback, private or metadata
/// hosts. Returns the parsed URL on success.
pub fn validate_url(raw: &str) -> Result<Url> {
    let parsed = Url::parse(raw)?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(XError::UnsupportedScheme);
    }

    let blocked = match parsed.host() {
        Some(Host::Domain(name)) => is_blocked_host(name),
        Some(Host::Ipv4(addr)) => is_blocked_ipv4(addr),
        Some(Host::Ipv6(addr)) => is_blocked_ipv6(addr),
        None => return Err(XError::InvalidUrl(url::ParseError::EmptyHost)),
    };
    if blocked {
        return Err(XError::PrivateNetwork);
    }

    Ok(parsed)
}

/// Check a host name against the blocklist. Case and one trailing root dot
/// are ignored.
pub fn is_blocked_host(name: &str) -> bool {
    let name = name.to_ascii_lowercase();
    let name = name.strip_suffix('.').unwrap_or(&name);

    BLOCKED_NAMES.contains(&name) || name.ends_with(".localhost") || name.ends_with(".local")
}

fn is_blocked_ipv4(addr: Ipv4Addr) -> bool {
    addr.is_loopback()
        || addr.is_private()
        || addr.is_unspecified()
        || addr.is_link_local()
        || addr == METADATA_V4
}

fn is_blocked_ipv6(addr: Ipv6Addr) -> bool {
    let first = addr.segments()[0];
    addr.is_loopback()
        || addr.is_unspecified()
        // fc00::/7 unique local, fe80::/10 link local
        || (first & 0xfe00) == 0xfc00
        || (first & 0xffc0) == 0xfe80
        || addr.to_ipv4_mapped().is_some_and(is_blocked_ipv4)
}
