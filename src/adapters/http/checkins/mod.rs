//! HTTP adapter for front-desk check-ins.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use routes::checkin_routes;
