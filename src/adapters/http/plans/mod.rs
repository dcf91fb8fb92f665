//! HTTP adapter for the plan catalog.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use routes::plan_routes;
