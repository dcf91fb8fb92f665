//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the application and the outside world. Adapters implement these ports.
//!
//! ## Storage Ports
//!
//! - `UnitOfWork` / `MembershipTransaction` - Atomic writes to the member ledger
//! - `MembershipReader` - Listings, detail views, sweep candidates, dashboard
//! - `PlanRepository` - Plan catalog
//! - `CheckinRepository` - Front-desk visits
//! - `UserRepository` - Staff accounts
//!
//! ## Service Ports
//!
//! - `Notifier` - Best-effort member notifications
//! - `Clock` - Current time and date
//! - `SessionValidator` - Bearer token validation
//! - `PasswordHasher` / `TokenIssuer` - Staff login

mod checkin_repository;
mod clock;
mod credentials;
mod membership_reader;
mod notifier;
mod plan_repository;
mod session_validator;
mod unit_of_work;
mod user_repository;

pub use checkin_repository::CheckinRepository;
pub use clock::Clock;
pub use credentials::{AccessToken, PasswordHasher, TokenIssuer};
pub use membership_reader::{
    DashboardStats, MemberFilter, MemberView, MembershipReader, Page, PageRequest,
    PeriodView, PlanChangeView, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT,
};
pub use notifier::{Notification, Notifier, PlanChangeNotice, WelcomeNotice};
pub use plan_repository::PlanRepository;
pub use session_validator::SessionValidator;
pub use unit_of_work::{MembershipTransaction, UnitOfWork};
pub use user_repository::UserRepository;
