//! Payments and plan change audit records. Both are append-only.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{
    is_positive, round_money, MemberId, PaymentId, PeriodId, PlanChangeId, PlanId, Timestamp,
    ValidationError,
};

/// How a payment was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[default]
    Cash,
    Digital,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Digital => "digital",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cash" => Ok(PaymentMethod::Cash),
            "digital" => Ok(PaymentMethod::Digital),
            other => Err(ValidationError::invalid_format(
                "method",
                format!("unknown payment method '{}'", other),
            )),
        }
    }
}

/// A payment recorded against a member's period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: PaymentId,
    pub member_id: MemberId,
    pub period_id: PeriodId,
    pub amount: Decimal,
    pub paid_on: NaiveDate,
    pub method: PaymentMethod,
    pub created_at: Timestamp,
}

impl Payment {
    /// Creates a payment; `amount` must be positive.
    pub fn new(
        member_id: MemberId,
        period_id: PeriodId,
        amount: Decimal,
        paid_on: NaiveDate,
        method: PaymentMethod,
        now: Timestamp,
    ) -> Result<Self, ValidationError> {
        let amount = round_money(amount);
        if !is_positive(amount) {
            return Err(ValidationError::invalid_format("amount", "must be greater than zero"));
        }
        Ok(Self {
            id: PaymentId::new(),
            member_id,
            period_id,
            amount,
            paid_on,
            method,
            created_at: now,
        })
    }
}

/// Audit record written once per plan switch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanChange {
    pub id: PlanChangeId,
    pub member_id: MemberId,
    pub from_plan_id: Option<PlanId>,
    pub to_plan_id: PlanId,
    pub changed_at: Timestamp,
}

impl PlanChange {
    pub fn new(member_id: MemberId, from: Option<PlanId>, to: PlanId, now: Timestamp) -> Self {
        Self {
            id: PlanChangeId::new(),
            member_id,
            from_plan_id: from,
            to_plan_id: to,
            changed_at: now,
        }
    }
}
