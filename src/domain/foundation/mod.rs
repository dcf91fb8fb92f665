//! Foundation module - Shared domain primitives.
//!
//! Contains identifiers, money helpers, timestamps, auth types and the
//! error vocabulary shared by every other layer.

mod auth;
mod errors;
mod ids;
mod money;
mod timestamp;

pub use auth::{AuthError, AuthenticatedUser, Role};
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{CheckinId, MemberId, PaymentId, PeriodId, PlanChangeId, PlanId, UserId};
pub use money::{due_amount, is_positive, round_money, MONEY_SCALE};
pub use timestamp::Timestamp;
