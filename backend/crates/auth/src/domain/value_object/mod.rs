//! Value Object Module

pub mod email;
pub mod route_class;
pub mod user_id;
pub mod user_role;
