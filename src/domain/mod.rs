//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, money, errors, auth types)
//! - `membership` - Plans, members, period ledger, payments, status rule
//! - `checkin` - Front-desk visits
//! - `user` - Staff accounts and credentials

pub mod checkin;
pub mod foundation;
pub mod membership;
pub mod user;
