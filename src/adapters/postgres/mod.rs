//! PostgreSQL adapters - Database implementations for the storage ports.
//!
//! - `PostgresUnitOfWork` - Transactional ledger writes with member row locks
//! - `PostgresMembershipReader` - Listings, detail views, sweep candidates, dashboard
//! - `PostgresPlanRepository` - Plan catalog
//! - `PostgresCheckinRepository` - Front-desk visits
//! - `PostgresUserRepository` - Staff accounts
//!
//! Schema lives in `migrations/`.

mod checkin_repository;
mod membership_reader;
mod plan_repository;
mod rows;
mod unit_of_work;
mod user_repository;

pub use checkin_repository::PostgresCheckinRepository;
pub use membership_reader::PostgresMembershipReader;
pub use plan_repository::PostgresPlanRepository;
pub use unit_of_work::{PostgresMembershipTransaction, PostgresUnitOfWork};
pub use user_repository::PostgresUserRepository;
