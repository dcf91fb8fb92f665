//! Gym Membership - front-desk membership management.
//!
//! Plans, members, billing periods, payments, check-ins and the daily
//! status sweep that moves members between active, soon-to-expire and
//! expired.
//!
//! The crate follows a ports-and-adapters layout:
//!
//! - `domain` - entities and pure rules (status, dues, validation)
//! - `ports` - traits the application depends on
//! - `application` - command and query handlers
//! - `adapters` - PostgreSQL, HTTP, email, scheduler and in-memory implementations
//! - `config` - environment-driven configuration

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
