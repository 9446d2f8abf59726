//! Platform Crate - Technical Infrastructure
//!
//! Shared technical foundations with no knowledge of sessions or roles:
//! - Cryptographic utilities (HMAC-SHA256, base64url, random secrets)
//! - Cookie header building and parsing
//! - Client identification for logs

pub mod client;
pub mod cookie;
pub mod crypto;
