//! Member notification port.
//!
//! Fire-and-forget: callers log a failed `send` and carry on. A failed
//! notification never fails or rolls back the operation that caused it.

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::domain::foundation::{DomainError, MemberId};
use crate::domain::membership::MemberStatus;

/// Sends notifications to members.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, notification: &Notification) -> Result<(), DomainError>;
}

/// A message for one member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Welcome(WelcomeNotice),
    PlanChanged(PlanChangeNotice),
}

impl Notification {
    /// Short name used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Notification::Welcome(_) => "welcome",
            Notification::PlanChanged(_) => "plan_changed",
        }
    }

    /// Destination email address.
    pub fn recipient(&self) -> &str {
        match self {
            Notification::Welcome(n) => &n.email,
            Notification::PlanChanged(n) => &n.email,
        }
    }

    pub fn member_id(&self) -> MemberId {
        match self {
            Notification::Welcome(n) => n.member_id,
            Notification::PlanChanged(n) => n.member_id,
        }
    }
}

/// Sent after a member is enrolled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WelcomeNotice {
    pub member_id: MemberId,
    pub email: String,
    pub name: String,
    pub age: i32,
    pub phone: Option<String>,
    pub plan_name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub fees_paid: Decimal,
    pub status: MemberStatus,
}

/// Sent after a plan switch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanChangeNotice {
    pub member_id: MemberId,
    pub email: String,
    pub name: String,
    pub from_plan: String,
    pub to_plan: String,
    pub changed_on: NaiveDate,
}
