//! Shared Kernel
//!
//! The small vocabulary every InkWell crate agrees on:
//! - [`error::app_error::AppError`] and its result alias
//! - [`error::kind::ErrorKind`], the HTTP-facing classification
//!
//! Anything domain specific (sessions, roles, routes) lives in the crates
//! that own it.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
