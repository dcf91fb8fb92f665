//! Membership period: one billing cycle of a member on a plan.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{due_amount, round_money, MemberId, PeriodId, PlanId, Timestamp};

use super::{PeriodKind, PeriodStatus, Plan};

/// A billing period in a member's ledger.
///
/// # Invariants
///
/// - `due_amount == max(0, plan_price - fees_paid)` after every mutation
/// - `plan_price` is a snapshot taken when the period opens
/// - once terminal (`completed`/`cancelled`) the period no longer accrues payments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipPeriod {
    pub id: PeriodId,
    pub member_id: MemberId,
    pub plan_id: PlanId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub plan_price: Decimal,
    pub fees_paid: Decimal,
    pub due_amount: Decimal,
    pub status: PeriodStatus,
    pub kind: PeriodKind,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl MembershipPeriod {
    /// Opens a new active period on `plan`, snapshotting its price.
    pub fn open(
        member_id: MemberId,
        plan: &Plan,
        start_date: NaiveDate,
        end_date: NaiveDate,
        fees_paid: Decimal,
        kind: PeriodKind,
        now: Timestamp,
    ) -> Self {
        let fees_paid = round_money(fees_paid);
        Self {
            id: PeriodId::new(),
            member_id,
            plan_id: plan.id,
            start_date,
            end_date,
            plan_price: plan.price,
            fees_paid,
            due_amount: due_amount(plan.price, fees_paid),
            status: PeriodStatus::Active,
            kind,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == PeriodStatus::Active
    }

    /// Adds a payment to this period and recomputes the due amount.
    pub fn apply_payment(&mut self, amount: Decimal, now: Timestamp) {
        self.fees_paid = round_money(self.fees_paid + amount);
        self.due_amount = due_amount(self.plan_price, self.fees_paid);
        self.updated_at = now;
    }

    /// Closes the period. Has no effect on an already terminal period.
    pub fn complete(&mut self, now: Timestamp) {
        if self.is_active() {
            self.status = PeriodStatus::Completed;
            self.updated_at = now;
        }
    }
}
