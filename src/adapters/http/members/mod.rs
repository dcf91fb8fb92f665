//! HTTP adapter for members and their payments.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use routes::{member_routes, payment_routes};
