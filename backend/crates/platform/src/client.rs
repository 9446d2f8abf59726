//! Client identification utilities
//!
//! Best-effort client address for logs. Never used for access decisions.

use http::HeaderMap;
use std::net::IpAddr;

/// Resolve the client IP address.
///
/// Order: first entry of `X-Forwarded-For`, then `X-Real-IP`, then the
/// direct connection address.
pub fn extract_client_ip(headers: &HeaderMap, direct_ip: Option<IpAddr>) -> Option<IpAddr> {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|xff| xff.split(',').next())
        .and_then(|first| first.trim().parse::<IpAddr>().ok());

    let real_ip = || {
        headers
            .get("x-real-ip")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<IpAddr>().ok())
    };

    forwarded.or_else(real_ip).or(direct_ip)
}
