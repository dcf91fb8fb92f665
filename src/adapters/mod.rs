//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the application to external systems:
//! - `postgres` - sqlx-backed storage
//! - `memory` - In-memory storage and clocks for tests and local runs
//! - `auth` - Bearer tokens and password hashing
//! - `notify` - Member email notifications
//! - `scheduler` - Periodic status sweep
//! - `http` - axum REST API

pub mod auth;
pub mod http;
pub mod memory;
pub mod notify;
pub mod postgres;
pub mod scheduler;

pub use auth::{Argon2PasswordHasher, JwtSessionValidator, JwtTokenIssuer, MockSessionValidator};
pub use memory::{FixedClock, InMemoryStore, SystemClock};
pub use notify::{LoggingNotifier, ResendNotifier};
pub use postgres::{
    PostgresCheckinRepository, PostgresMembershipReader, PostgresPlanRepository,
    PostgresUnitOfWork, PostgresUserRepository,
};
pub use scheduler::StatusSweepScheduler;
