//! HTTP adapter for staff accounts and login.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use routes::{auth_routes, user_routes};
