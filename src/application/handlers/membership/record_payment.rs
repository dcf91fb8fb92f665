//! RecordPaymentHandler - Command handler for recording a payment.
//!
//! The payment, the active period's balance and the member's billing copy
//! are written in one transaction. A repeat of an existing payment (same
//! member, amount and date) returns the stored payment and changes nothing.

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::domain::foundation::{round_money, MemberId};
use crate::domain::membership::{
    Member, MembershipError, MembershipPeriod, Payment, PaymentMethod,
};
use crate::ports::{Clock, UnitOfWork};

use super::period_ledger::PeriodLedger;

/// Command to record a payment against the member's active period.
#[derive(Debug, Clone)]
pub struct RecordPaymentCommand {
    pub member_id: MemberId,
    pub amount: Decimal,
    /// Defaults to today.
    pub paid_on: Option<NaiveDate>,
    /// Defaults to cash.
    pub method: Option<PaymentMethod>,
}

/// Result of recording a payment.
#[derive(Debug, Clone)]
pub struct RecordPaymentResult {
    pub payment: Payment,
    /// True if an identical payment already existed and was returned as is.
    pub duplicate: bool,
    pub member: Member,
    pub period: MembershipPeriod,
}

/// Handler for recording payments.
pub struct RecordPaymentHandler {
    uow: Arc<dyn UnitOfWork>,
    clock: Arc<dyn Clock>,
}

impl RecordPaymentHandler {
    pub fn new(uow: Arc<dyn UnitOfWork>, clock: Arc<dyn Clock>) -> Self {
        Self { uow, clock }
    }

    pub async fn handle(
        &self,
        cmd: RecordPaymentCommand,
    ) -> Result<RecordPaymentResult, MembershipError> {
        let now = self.clock.now();
        let amount = round_money(cmd.amount);
        if amount <= Decimal::ZERO {
            return Err(MembershipError::validation("amount", "must be greater than zero"));
        }
        let paid_on = cmd.paid_on.unwrap_or_else(|| now.date());

        let mut tx = self.uow.begin().await?;

        let mut member = tx
            .find_member_for_update(&cmd.member_id)
            .await?
            .ok_or(MembershipError::MemberNotFound(cmd.member_id))?;
        let mut period = tx
            .find_active_period(&member.id)
            .await?
            .ok_or(MembershipError::NoActivePeriod(member.id))?;

        if let Some(existing) = tx.find_matching_payment(&member.id, amount, paid_on).await? {
            tracing::info!(
                member_id = %member.id,
                payment_id = %existing.id,
                "duplicate payment submission ignored"
            );
            return Ok(RecordPaymentResult {
                payment: existing,
                duplicate: true,
                member,
                period,
            });
        }

        let payment = Payment::new(
            member.id,
            period.id,
            amount,
            paid_on,
            cmd.method.unwrap_or_default(),
            now,
        )?;
        tx.insert_payment(&payment).await?;

        PeriodLedger::new(tx.as_mut(), now)
            .apply_payment(&mut period, amount)
            .await?;
        member.sync_billing(&period, now);
        tx.update_member(&member).await?;

        tx.commit().await?;

        tracing::info!(
            member_id = %member.id,
            payment_id = %payment.id,
            period_id = %period.id,
            amount = %payment.amount,
            due_amount = %member.due_amount,
            "payment recorded"
        );

        Ok(RecordPaymentResult {
            payment,
            duplicate: false,
            member,
            period,
        })
    }
}
