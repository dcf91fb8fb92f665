//! PeriodLedger - the single write path for membership periods.
//!
//! Every operation runs inside the caller's transaction, so a period change
//! commits or rolls back together with the member and payment writes that
//! go with it.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::domain::foundation::{MemberId, Timestamp};
use crate::domain::membership::{Member, MembershipError, MembershipPeriod, PeriodKind, Plan};
use crate::ports::MembershipTransaction;

/// Outcome of closing the active period and opening its successor.
#[derive(Debug, Clone)]
pub struct PeriodRollover {
    /// The period that was active before, now completed. `None` if the
    /// member had no active period (e.g. the sweep already closed it).
    pub closed: Option<MembershipPeriod>,
    pub opened: MembershipPeriod,
}

/// Period operations bound to one transaction.
pub struct PeriodLedger<'a> {
    tx: &'a mut dyn MembershipTransaction,
    now: Timestamp,
}

impl<'a> PeriodLedger<'a> {
    pub fn new(tx: &'a mut dyn MembershipTransaction, now: Timestamp) -> Self {
        Self { tx, now }
    }

    /// Opens the first period for a freshly inserted member.
    pub async fn open_initial_period(
        &mut self,
        member: &Member,
        plan: &Plan,
        start_date: NaiveDate,
        end_date: NaiveDate,
        fees_paid: Decimal,
    ) -> Result<MembershipPeriod, MembershipError> {
        if self.tx.find_active_period(&member.id).await?.is_some() {
            return Err(MembershipError::infrastructure(format!(
                "member {} already has an active period",
                member.id
            )));
        }

        let period = MembershipPeriod::open(
            member.id,
            plan,
            start_date,
            end_date,
            fees_paid,
            PeriodKind::Initial,
            self.now,
        );
        self.tx.insert_period(&period).await?;
        Ok(period)
    }

    /// Completes the member's active period, then opens a fresh one on
    /// `plan` with nothing paid yet.
    pub async fn close_active_and_open(
        &mut self,
        member_id: MemberId,
        plan: &Plan,
        start_date: NaiveDate,
        end_date: NaiveDate,
        kind: PeriodKind,
    ) -> Result<PeriodRollover, MembershipError> {
        let closed = self.close_active(member_id).await?;

        let opened = MembershipPeriod::open(
            member_id,
            plan,
            start_date,
            end_date,
            Decimal::ZERO,
            kind,
            self.now,
        );
        self.tx.insert_period(&opened).await?;

        Ok(PeriodRollover { closed, opened })
    }

    /// Completes the member's active period, if there is one.
    pub async fn close_active(
        &mut self,
        member_id: MemberId,
    ) -> Result<Option<MembershipPeriod>, MembershipError> {
        match self.tx.find_active_period(&member_id).await? {
            Some(mut active) => {
                active.complete(self.now);
                self.tx.update_period(&active).await?;
                Ok(Some(active))
            }
            None => Ok(None),
        }
    }

    /// Adds `amount` to the period and persists it.
    pub async fn apply_payment(
        &mut self,
        period: &mut MembershipPeriod,
        amount: Decimal,
    ) -> Result<(), MembershipError> {
        period.apply_payment(amount, self.now);
        self.tx.update_period(period).await?;
        Ok(())
    }
}
