//! HTTP adapter for the dashboard and maintenance tasks.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use routes::{dashboard_routes, task_routes};
