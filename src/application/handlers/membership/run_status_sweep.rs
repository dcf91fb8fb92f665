//! RunStatusSweepHandler - Recomputes member and period status from the calendar.
//!
//! Two passes against today's date:
//! 1. Members whose end date has arrived become expired and their active
//!    period is completed.
//! 2. Active members ending within the next week become soon-to-expire.
//!
//! Each member is updated in its own transaction after re-reading it under
//! lock, so a concurrent renewal wins and the sweep is safe to repeat.

use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::domain::foundation::{MemberId, Timestamp};
use crate::domain::membership::{MemberStatus, MembershipError, SOON_TO_EXPIRE_WINDOW_DAYS};
use crate::ports::{Clock, MembershipReader, UnitOfWork};

use super::period_ledger::PeriodLedger;

/// Counts from one sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusSweepReport {
    pub expired: u32,
    pub soon_to_expire: u32,
    pub periods_completed: u32,
    /// Members whose update failed; they are picked up again next run.
    pub failed: u32,
}

impl StatusSweepReport {
    /// True if the sweep changed nothing.
    pub fn is_noop(&self) -> bool {
        self.expired == 0 && self.soon_to_expire == 0 && self.periods_completed == 0
    }
}

/// Handler for the status sweep.
pub struct RunStatusSweepHandler {
    uow: Arc<dyn UnitOfWork>,
    reader: Arc<dyn MembershipReader>,
    clock: Arc<dyn Clock>,
}

impl RunStatusSweepHandler {
    pub fn new(
        uow: Arc<dyn UnitOfWork>,
        reader: Arc<dyn MembershipReader>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self { uow, reader, clock }
    }

    /// Runs both passes. Fails only if candidate selection fails; per-member
    /// failures are logged and counted.
    pub async fn handle(&self) -> Result<StatusSweepReport, MembershipError> {
        let now = self.clock.now();
        let today = now.date();
        let until = today + Duration::days(SOON_TO_EXPIRE_WINDOW_DAYS);
        let mut report = StatusSweepReport::default();

        for member_id in self.reader.find_expiry_candidates(today).await? {
            match self.expire(member_id, today, now).await {
                Ok(Some(completed)) => {
                    report.expired += 1;
                    report.periods_completed += completed;
                }
                Ok(None) => {}
                Err(e) => {
                    report.failed += 1;
                    tracing::error!(member_id = %member_id, error = %e, "failed to expire member");
                }
            }
        }

        for member_id in self.reader.find_soon_to_expire_candidates(today, until).await? {
            match self.mark_soon_to_expire(member_id, today, until, now).await {
                Ok(true) => report.soon_to_expire += 1,
                Ok(false) => {}
                Err(e) => {
                    report.failed += 1;
                    tracing::error!(
                        member_id = %member_id,
                        error = %e,
                        "failed to mark member soon to expire"
                    );
                }
            }
        }

        if report.is_noop() && report.failed == 0 {
            tracing::debug!(%today, "status sweep found nothing to change");
        } else {
            tracing::info!(
                %today,
                expired = report.expired,
                soon_to_expire = report.soon_to_expire,
                periods_completed = report.periods_completed,
                failed = report.failed,
                "status sweep finished"
            );
        }

        Ok(report)
    }

    /// Returns the number of periods completed, or `None` if the member no
    /// longer qualifies.
    async fn expire(
        &self,
        member_id: MemberId,
        today: NaiveDate,
        now: Timestamp,
    ) -> Result<Option<u32>, MembershipError> {
        let mut tx = self.uow.begin().await?;
        let Some(mut member) = tx.find_member_for_update(&member_id).await? else {
            return Ok(None);
        };
        if member.end_date > today || member.status == MemberStatus::Expired {
            return Ok(None);
        }

        member.set_status(MemberStatus::Expired, now);
        let closed = PeriodLedger::new(tx.as_mut(), now)
            .close_active(member_id)
            .await?;
        tx.update_member(&member).await?;
        tx.commit().await?;

        tracing::debug!(member_id = %member_id, end_date = %member.end_date, "member expired");
        Ok(Some(u32::from(closed.is_some())))
    }

    async fn mark_soon_to_expire(
        &self,
        member_id: MemberId,
        today: NaiveDate,
        until: NaiveDate,
        now: Timestamp,
    ) -> Result<bool, MembershipError> {
        let mut tx = self.uow.begin().await?;
        let Some(mut member) = tx.find_member_for_update(&member_id).await? else {
            return Ok(false);
        };
        let qualifies = member.status == MemberStatus::Active
            && member.end_date > today
            && member.end_date <= until;
        if !qualifies {
            return Ok(false);
        }

        member.set_status(MemberStatus::SoonToExpire, now);
        tx.update_member(&member).await?;
        tx.commit().await?;
        Ok(true)
    }
}
