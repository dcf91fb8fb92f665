//! Membership plan catalog entry.

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{is_positive, round_money, PlanId, Timestamp, ValidationError};

/// A membership plan members can be enrolled on.
///
/// # Invariants
///
/// - `price > 0`, two decimal places
/// - `duration_days > 0`
/// - Periods snapshot `price` when opened, so edits never reach back into history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub id: PlanId,
    pub name: String,
    pub price: Decimal,
    pub duration_days: i32,
    pub features: Option<String>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Partial edit of a plan; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlanChanges {
    pub name: Option<String>,
    pub price: Option<Decimal>,
    pub duration_days: Option<i32>,
    pub features: Option<String>,
    pub is_active: Option<bool>,
}

impl Plan {
    /// Creates a new, active plan.
    pub fn new(
        name: impl Into<String>,
        price: Decimal,
        duration_days: i32,
        features: Option<String>,
        now: Timestamp,
    ) -> Result<Self, ValidationError> {
        let name = validate_name(name.into())?;
        validate_price(price)?;
        validate_duration(duration_days)?;

        Ok(Self {
            id: PlanId::new(),
            name,
            price: round_money(price),
            duration_days,
            features,
            is_active: true,
            created_at: now,
            updated_at: now,
        })
    }

    /// Applies a partial edit. Nothing is changed if any field is invalid.
    pub fn apply(&mut self, changes: PlanChanges, now: Timestamp) -> Result<(), ValidationError> {
        let name = changes.name.map(validate_name).transpose()?;
        if let Some(price) = changes.price {
            validate_price(price)?;
        }
        if let Some(days) = changes.duration_days {
            validate_duration(days)?;
        }

        if let Some(name) = name {
            self.name = name;
        }
        if let Some(price) = changes.price {
            self.price = round_money(price);
        }
        if let Some(days) = changes.duration_days {
            self.duration_days = days;
        }
        if changes.features.is_some() {
            self.features = changes.features;
        }
        if let Some(active) = changes.is_active {
            self.is_active = active;
        }
        self.updated_at = now;
        Ok(())
    }

    /// End date of a period on this plan starting at `start`, or `None`
    /// when it falls outside the calendar range.
    pub fn period_end(&self, start: NaiveDate) -> Option<NaiveDate> {
        start.checked_add_days(Days::new(u64::try_from(self.duration_days).ok()?))
    }

    /// Soft-deletes the plan.
    pub fn deactivate(&mut self, now: Timestamp) {
        self.is_active = false;
        self.updated_at = now;
    }
}

fn validate_name(name: String) -> Result<String, ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::empty_field("name"));
    }
    Ok(trimmed.to_string())
}

fn validate_price(price: Decimal) -> Result<(), ValidationError> {
    if !is_positive(price) {
        return Err(ValidationError::invalid_format("price", "must be greater than zero"));
    }
    Ok(())
}

fn validate_duration(days: i32) -> Result<(), ValidationError> {
    if days <= 0 {
        return Err(ValidationError::out_of_range("durationDays", 1, i32::MAX as i64, days as i64));
    }
    Ok(())
}
