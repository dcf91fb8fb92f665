//! Membership-specific error types.
//!
//! # Kind / HTTP Status Mapping
//!
//! | Error | Kind | HTTP Status |
//! |-------|------|-------------|
//! | MemberNotFound, PlanNotFound, NoActivePeriod | NotFound | 404 |
//! | DuplicateContact, PlanInUse | Conflict | 409 |
//! | OutstandingDue, AlreadyCheckedIn, NoOpenCheckin, ValidationFailed | BadRequest | 400 |
//! | Infrastructure | Internal | 500 |

use rust_decimal::Decimal;

use crate::domain::foundation::{DomainError, ErrorCode, MemberId, PlanId, ValidationError};

/// Caller-facing error category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Unauthorized,
    NotFound,
    Conflict,
    BadRequest,
    Internal,
}

/// Membership-specific errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MembershipError {
    /// Member was not found.
    MemberNotFound(MemberId),

    /// Plan was not found.
    PlanNotFound(PlanId),

    /// Member has no active membership period.
    NoActivePeriod(MemberId),

    /// Email or phone already belongs to another member.
    DuplicateContact { field: String, value: String },

    /// Plan cannot be removed while members are on it.
    PlanInUse { plan_id: PlanId, members: i64 },

    /// Plan switch attempted while money is owed on the current plan.
    OutstandingDue { due: Decimal },

    /// Member already has an open check-in.
    AlreadyCheckedIn(MemberId),

    /// Member has no open check-in to close.
    NoOpenCheckin(MemberId),

    /// Validation failed.
    ValidationFailed { field: String, message: String },

    /// Infrastructure error.
    Infrastructure(String),
}

impl MembershipError {
    // Constructor functions for cleaner error creation

    pub fn member_not_found(id: MemberId) -> Self {
        MembershipError::MemberNotFound(id)
    }

    pub fn plan_not_found(id: PlanId) -> Self {
        MembershipError::PlanNotFound(id)
    }

    pub fn no_active_period(id: MemberId) -> Self {
        MembershipError::NoActivePeriod(id)
    }

    pub fn duplicate_contact(field: impl Into<String>, value: impl Into<String>) -> Self {
        MembershipError::DuplicateContact {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn plan_in_use(plan_id: PlanId, members: i64) -> Self {
        MembershipError::PlanInUse { plan_id, members }
    }

    pub fn outstanding_due(due: Decimal) -> Self {
        MembershipError::OutstandingDue { due }
    }

    pub fn already_checked_in(id: MemberId) -> Self {
        MembershipError::AlreadyCheckedIn(id)
    }

    pub fn no_open_checkin(id: MemberId) -> Self {
        MembershipError::NoOpenCheckin(id)
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        MembershipError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        MembershipError::Infrastructure(message.into())
    }

    /// Returns the caller-facing category.
    pub fn kind(&self) -> ErrorKind {
        match self {
            MembershipError::MemberNotFound(_)
            | MembershipError::PlanNotFound(_)
            | MembershipError::NoActivePeriod(_) => ErrorKind::NotFound,
            MembershipError::DuplicateContact { .. } | MembershipError::PlanInUse { .. } => {
                ErrorKind::Conflict
            }
            MembershipError::OutstandingDue { .. }
            | MembershipError::AlreadyCheckedIn(_)
            | MembershipError::NoOpenCheckin(_)
            | MembershipError::ValidationFailed { .. } => ErrorKind::BadRequest,
            MembershipError::Infrastructure(_) => ErrorKind::Internal,
        }
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            MembershipError::MemberNotFound(_) => ErrorCode::MemberNotFound,
            MembershipError::PlanNotFound(_) => ErrorCode::PlanNotFound,
            MembershipError::NoActivePeriod(_) => ErrorCode::PeriodNotFound,
            MembershipError::DuplicateContact { .. } => ErrorCode::DuplicateEntry,
            MembershipError::PlanInUse { .. } => ErrorCode::PlanInUse,
            MembershipError::OutstandingDue { .. } => ErrorCode::OutstandingDue,
            MembershipError::AlreadyCheckedIn(_) => ErrorCode::AlreadyCheckedIn,
            MembershipError::NoOpenCheckin(_) => ErrorCode::NoOpenCheckin,
            MembershipError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            MembershipError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }

    /// Returns a user-friendly error message.
    pub fn message(&self) -> String {
        match self {
            MembershipError::MemberNotFound(id) => format!("Member not found: {}", id),
            MembershipError::PlanNotFound(id) => format!("Membership plan not found: {}", id),
            MembershipError::NoActivePeriod(id) => {
                format!("No active membership period for member {}", id)
            }
            MembershipError::DuplicateContact { field, value } => {
                format!("A member with {} '{}' already exists", field, value)
            }
            MembershipError::PlanInUse { members, .. } => format!(
                "Plan in use by {} member{}; reassign first",
                members,
                if *members == 1 { "" } else { "s" }
            ),
            MembershipError::OutstandingDue { due } => format!(
                "Due amount must be cleared before switching plans (outstanding: {})",
                due
            ),
            MembershipError::AlreadyCheckedIn(_) => "Member already checked in".to_string(),
            MembershipError::NoOpenCheckin(_) => "No open check-in found".to_string(),
            MembershipError::ValidationFailed { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
            MembershipError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }
}

impl std::fmt::Display for MembershipError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for MembershipError {}

impl From<DomainError> for MembershipError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::DuplicateEntry => MembershipError::DuplicateContact {
                field: err.detail("field").unwrap_or("contact").to_string(),
                value: err.detail("value").unwrap_or_default().to_string(),
            },
            ErrorCode::ValidationFailed => MembershipError::ValidationFailed {
                field: err.detail("field").unwrap_or("unknown").to_string(),
                message: err.message,
            },
            _ => MembershipError::Infrastructure(err.to_string()),
        }
    }
}

impl From<ValidationError> for MembershipError {
    fn from(err: ValidationError) -> Self {
        MembershipError::ValidationFailed {
            field: err.field().to_string(),
            message: err.to_string(),
        }
    }
}

impl From<MembershipError> for DomainError {
    fn from(err: MembershipError) -> Self {
        DomainError::new(err.code(), err.message())
    }
}
