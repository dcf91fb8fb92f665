//! Membership handlers.
//!
//! Command and query handlers for the member lifecycle:
//!
//! ## Commands
//! - Enrolling members
//! - Profile edits, renewals and plan switches
//! - Recording payments
//! - The status sweep
//!
//! ## Queries
//! - Member detail and listing
//! - Payments, plan history and membership periods
//!
//! Every write goes through `PeriodLedger` inside one transaction.

mod create_member;
mod get_member;
mod get_membership_periods;
mod get_plan_history;
mod list_members;
mod list_payments;
mod notifications;
mod period_ledger;
mod record_payment;
mod run_status_sweep;
mod update_member;

pub use period_ledger::{PeriodLedger, PeriodRollover};

// Commands
pub use create_member::{CreateMemberCommand, CreateMemberHandler, CreateMemberResult};
pub use record_payment::{RecordPaymentCommand, RecordPaymentHandler, RecordPaymentResult};
pub use run_status_sweep::{RunStatusSweepHandler, StatusSweepReport};
pub use update_member::{
    MemberChange, UpdateMemberCommand, UpdateMemberHandler, UpdateMemberResult,
};

// Queries
pub use get_member::{GetMemberHandler, GetMemberQuery};
pub use get_membership_periods::{GetMembershipPeriodsHandler, GetMembershipPeriodsQuery};
pub use get_plan_history::{GetPlanHistoryHandler, GetPlanHistoryQuery};
pub use list_members::{ListMembersHandler, ListMembersQuery};
pub use list_payments::{ListPaymentsHandler, ListPaymentsQuery, PaymentListing};
