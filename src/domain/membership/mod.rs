//! Membership domain module.
//!
//! Plans, members, their billing period ledger, payments and the status rule.
//!
//! # Module Structure
//!
//! - `plan` - Plan catalog entry
//! - `member` - Member entity with cached billing fields
//! - `period` - MembershipPeriod ledger entry
//! - `payment` - Payment and PlanChange audit records
//! - `status` - Status rule, period status and period kind
//! - `errors` - MembershipError taxonomy

mod errors;
mod member;
mod payment;
mod period;
mod plan;
mod status;

pub use errors::{ErrorKind, MembershipError};
pub use member::{Member, MemberProfile, ProfileChanges, MAX_AGE};
pub use payment::{Payment, PaymentMethod, PlanChange};
pub use period::MembershipPeriod;
pub use plan::{Plan, PlanChanges};
pub use status::{
    balance_days, days_left, MemberStatus, PeriodKind, PeriodStatus, SOON_TO_EXPIRE_WINDOW_DAYS,
};
