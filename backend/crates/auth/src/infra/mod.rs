//! Infrastructure Layer
//!
//! Collaborator implementations: the HTTP backend and an in-memory stand-in.

pub mod http;
pub mod memory;

pub use self::http::{HttpCredentialBackend, HttpSessionSource};
pub use memory::InMemoryCredentialBackend;
