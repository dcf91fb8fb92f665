//! Member entity.
//!
//! Dates, fees and status on the member are a cached view of the member's
//! active period. They are only written together with that period, inside
//! the same transaction.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    due_amount, round_money, MemberId, PlanId, Timestamp, ValidationError,
};

use super::{balance_days, MemberStatus, MembershipPeriod, Plan};

/// Upper bound accepted for a member's age.
pub const MAX_AGE: i32 = 120;

/// A gym member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: MemberId,
    pub name: String,
    pub age: i32,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub plan_id: PlanId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub fees_paid: Decimal,
    pub due_amount: Decimal,
    pub status: MemberStatus,
    pub balance_days: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Validated personal and contact details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberProfile {
    pub name: String,
    pub age: i32,
    pub phone: Option<String>,
    pub email: Option<String>,
}

impl MemberProfile {
    /// Validates and normalizes contact details.
    ///
    /// Blank phone/email values are treated as absent.
    pub fn new(
        name: impl Into<String>,
        age: i32,
        phone: Option<String>,
        email: Option<String>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            name: validate_name(name.into())?,
            age: validate_age(age)?,
            phone: normalize_phone(phone),
            email: normalize_email(email)?,
        })
    }
}

/// Partial edit of a member's profile; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileChanges {
    pub name: Option<String>,
    pub age: Option<i32>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

impl Member {
    /// Builds a new member on `plan` for the given dates.
    ///
    /// `status` and `balance_days` are derived from the dates unless given.
    #[allow(clippy::too_many_arguments)]
    pub fn enroll(
        profile: MemberProfile,
        plan: &Plan,
        start_date: NaiveDate,
        end_date: NaiveDate,
        fees_paid: Decimal,
        status: Option<MemberStatus>,
        balance: Option<i32>,
        today: NaiveDate,
        now: Timestamp,
    ) -> Self {
        let fees_paid = round_money(fees_paid);
        Self {
            id: MemberId::new(),
            name: profile.name,
            age: profile.age,
            phone: profile.phone,
            email: profile.email,
            plan_id: plan.id,
            start_date,
            end_date,
            fees_paid,
            due_amount: due_amount(plan.price, fees_paid),
            status: status.unwrap_or_else(|| MemberStatus::from_end_date(end_date, today)),
            balance_days: balance.unwrap_or_else(|| balance_days(start_date, end_date)),
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies profile edits. Nothing is changed if any field is invalid.
    pub fn apply_profile(&mut self, changes: ProfileChanges) -> Result<(), ValidationError> {
        let name = changes.name.map(validate_name).transpose()?;
        let age = changes.age.map(validate_age).transpose()?;
        let email = match changes.email {
            Some(email) => Some(normalize_email(Some(email))?),
            None => None,
        };

        if let Some(name) = name {
            self.name = name;
        }
        if let Some(age) = age {
            self.age = age;
        }
        if let Some(phone) = changes.phone {
            self.phone = normalize_phone(Some(phone));
        }
        if let Some(email) = email {
            self.email = email;
        }
        Ok(())
    }

    /// Moves the member onto `period`: plan, dates and billing fields are
    /// copied from it, and status/balance are recomputed from the new dates.
    pub fn adopt_period(&mut self, period: &MembershipPeriod, today: NaiveDate, now: Timestamp) {
        self.plan_id = period.plan_id;
        self.start_date = period.start_date;
        self.end_date = period.end_date;
        self.balance_days = balance_days(period.start_date, period.end_date);
        self.status = MemberStatus::from_end_date(period.end_date, today);
        self.sync_billing(period, now);
    }

    /// Refreshes `fees_paid`/`due_amount` from the active period.
    pub fn sync_billing(&mut self, period: &MembershipPeriod, now: Timestamp) {
        self.fees_paid = period.fees_paid;
        self.due_amount = period.due_amount;
        self.updated_at = now;
    }

    /// Sets the status. Returns false if it already held that value.
    pub fn set_status(&mut self, status: MemberStatus, now: Timestamp) -> bool {
        if self.status == status {
            return false;
        }
        self.status = status;
        self.updated_at = now;
        true
    }

    /// Amount still owed against `plan` at its current price.
    pub fn due_on(&self, plan: &Plan) -> Decimal {
        due_amount(plan.price, self.fees_paid)
    }

    /// True if the member owes money on `plan`; plan switches are refused then.
    pub fn has_outstanding_due(&self, plan: &Plan) -> bool {
        self.due_on(plan) > Decimal::ZERO
    }
}

fn validate_name(name: String) -> Result<String, ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::empty_field("name"));
    }
    Ok(trimmed.to_string())
}

fn validate_age(age: i32) -> Result<i32, ValidationError> {
    if !(1..=MAX_AGE).contains(&age) {
        return Err(ValidationError::out_of_range("age", 1, MAX_AGE as i64, age as i64));
    }
    Ok(age)
}

fn normalize_phone(phone: Option<String>) -> Option<String> {
    phone
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
}

fn normalize_email(email: Option<String>) -> Result<Option<String>, ValidationError> {
    let Some(email) = email.map(|e| e.trim().to_string()).filter(|e| !e.is_empty()) else {
        return Ok(None);
    };
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(Some(email)),
        _ => Err(ValidationError::invalid_format("email", "not a valid email address")),
    }
}
