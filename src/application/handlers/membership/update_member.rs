//! UpdateMemberHandler - Command handler for profile edits, renewals and plan switches.
//!
//! - A different `plan_id` is a plan switch, refused while anything is owed.
//! - Same plan with new dates is a renewal.
//! - Anything else only edits the profile.
//!
//! Switches and renewals close the active period and open a new, unpaid one.

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::domain::foundation::{MemberId, PlanId};
use crate::domain::membership::{
    Member, MembershipError, PeriodKind, PlanChange, ProfileChanges,
};
use crate::ports::{
    Clock, MembershipTransaction, Notification, Notifier, PlanChangeNotice, UnitOfWork,
};

use super::notifications::dispatch;
use super::period_ledger::{PeriodLedger, PeriodRollover};

/// Command to update a member.
#[derive(Debug, Clone, Default)]
pub struct UpdateMemberCommand {
    pub member_id: MemberId,
    pub name: Option<String>,
    pub age: Option<i32>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub plan_id: Option<PlanId>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// Accepted for wire compatibility and ignored: only payments move fees.
    pub fees_paid: Option<Decimal>,
}

/// What the update did to the member's billing.
#[derive(Debug, Clone)]
pub enum MemberChange {
    ProfileOnly,
    Renewed(PeriodRollover),
    Switched {
        rollover: PeriodRollover,
        plan_change: PlanChange,
    },
}

/// Result of a successful update.
#[derive(Debug, Clone)]
pub struct UpdateMemberResult {
    pub member: Member,
    pub change: MemberChange,
}

/// Handler for member updates.
pub struct UpdateMemberHandler {
    uow: Arc<dyn UnitOfWork>,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
}

impl UpdateMemberHandler {
    pub fn new(
        uow: Arc<dyn UnitOfWork>,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            uow,
            notifier,
            clock,
        }
    }

    pub async fn handle(
        &self,
        cmd: UpdateMemberCommand,
    ) -> Result<UpdateMemberResult, MembershipError> {
        let now = self.clock.now();
        let today = now.date();

        if cmd.fees_paid.is_some() {
            tracing::debug!(member_id = %cmd.member_id, "ignoring feesPaid on member update");
        }

        let mut tx = self.uow.begin().await?;

        // 1. Load and edit profile
        let mut member = tx
            .find_member_for_update(&cmd.member_id)
            .await?
            .ok_or(MembershipError::MemberNotFound(cmd.member_id))?;
        member.apply_profile(ProfileChanges {
            name: cmd.name,
            age: cmd.age,
            phone: cmd.phone,
            email: cmd.email,
        })?;

        // 2. Contact uniqueness against other members
        ensure_contacts_free(tx.as_mut(), &member).await?;

        let current_plan = tx
            .find_plan(&member.plan_id)
            .await?
            .ok_or(MembershipError::PlanNotFound(member.plan_id))?;

        // 3. Switch, renew, or neither
        let switch_to = cmd.plan_id.filter(|id| *id != member.plan_id);
        let change = if let Some(new_plan_id) = switch_to {
            let new_plan = tx
                .find_plan(&new_plan_id)
                .await?
                .ok_or(MembershipError::PlanNotFound(new_plan_id))?;

            // Owed against the plan's current price, not the period snapshot.
            if member.has_outstanding_due(&current_plan) {
                return Err(MembershipError::outstanding_due(member.due_on(&current_plan)));
            }

            let start = cmd.start_date.unwrap_or(today);
            let end = match cmd.end_date {
                Some(end) => end,
                None => new_plan.period_end(start).ok_or_else(|| {
                    MembershipError::validation(
                        "durationDays",
                        format!("plan duration overflows the calendar from {}", start),
                    )
                })?,
            };
            check_dates(start, end)?;

            let rollover = PeriodLedger::new(tx.as_mut(), now)
                .close_active_and_open(member.id, &new_plan, start, end, PeriodKind::PlanSwitch)
                .await?;
            let plan_change = PlanChange::new(member.id, Some(current_plan.id), new_plan.id, now);
            tx.insert_plan_change(&plan_change).await?;
            member.adopt_period(&rollover.opened, today, now);

            Some((
                MemberChange::Switched {
                    rollover,
                    plan_change,
                },
                Some(new_plan),
            ))
        } else {
            let start = cmd.start_date.unwrap_or(member.start_date);
            let end = cmd.end_date.unwrap_or(member.end_date);
            if start != member.start_date || end != member.end_date {
                check_dates(start, end)?;
                let rollover = PeriodLedger::new(tx.as_mut(), now)
                    .close_active_and_open(
                        member.id,
                        &current_plan,
                        start,
                        end,
                        PeriodKind::Renewal,
                    )
                    .await?;
                member.adopt_period(&rollover.opened, today, now);
                Some((MemberChange::Renewed(rollover), None))
            } else {
                None
            }
        };

        let (change, switched_to) = match change {
            Some(outcome) => outcome,
            None => {
                if let Some(active) = tx.find_active_period(&member.id).await? {
                    member.sync_billing(&active, now);
                } else {
                    member.updated_at = now;
                }
                (MemberChange::ProfileOnly, None)
            }
        };

        // 4. Persist
        tx.update_member(&member).await?;
        tx.commit().await?;

        match &change {
            MemberChange::ProfileOnly => {
                tracing::info!(member_id = %member.id, "member profile updated")
            }
            MemberChange::Renewed(rollover) => tracing::info!(
                member_id = %member.id,
                period_id = %rollover.opened.id,
                end_date = %member.end_date,
                "membership renewed"
            ),
            MemberChange::Switched { rollover, .. } => tracing::info!(
                member_id = %member.id,
                from_plan_id = %current_plan.id,
                to_plan_id = %member.plan_id,
                period_id = %rollover.opened.id,
                "membership plan switched"
            ),
        }

        // 5. Plan change notification
        if let (Some(new_plan), Some(email)) = (switched_to, &member.email) {
            dispatch(
                &self.notifier,
                Notification::PlanChanged(PlanChangeNotice {
                    member_id: member.id,
                    email: email.clone(),
                    name: member.name.clone(),
                    from_plan: current_plan.name.clone(),
                    to_plan: new_plan.name,
                    changed_on: today,
                }),
            );
        }

        Ok(UpdateMemberResult { member, change })
    }
}

async fn ensure_contacts_free(
    tx: &mut dyn MembershipTransaction,
    member: &Member,
) -> Result<(), MembershipError> {
    if let Some(email) = &member.email {
        if let Some(owner) = tx.find_member_by_email(email).await? {
            if owner != member.id {
                return Err(MembershipError::duplicate_contact("email", email.clone()));
            }
        }
    }
    if let Some(phone) = &member.phone {
        if let Some(owner) = tx.find_member_by_phone(phone).await? {
            if owner != member.id {
                return Err(MembershipError::duplicate_contact("phone", phone.clone()));
            }
        }
    }
    Ok(())
}

fn check_dates(start: NaiveDate, end: NaiveDate) -> Result<(), MembershipError> {
    if end < start {
        return Err(MembershipError::validation("endDate", "must not be before startDate"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::FailPoint;
    use crate::application::handlers::membership::{RecordPaymentCommand, RecordPaymentHandler};
    use crate::application::handlers::test_support::{dec, today, Fixture};
    use crate::domain::membership::{ErrorKind, MemberStatus, PeriodStatus, PlanChanges};
    use crate::ports::{MembershipReader, PlanRepository};
    use chrono::Duration;

    fn handler(fx: &Fixture) -> UpdateMemberHandler {
        UpdateMemberHandler::new(Arc::new(fx.store.clone()), fx.notifier(), fx.clock())
    }

    async fn pay(fx: &Fixture, member_id: MemberId, amount: &str) {
        RecordPaymentHandler::new(Arc::new(fx.store.clone()), fx.clock())
            .handle(RecordPaymentCommand {
                member_id,
                amount: dec(amount),
                paid_on: Some(today() + Duration::days(1)),
                method: None,
            })
            .await
            .unwrap();
    }

    async fn active_periods(fx: &Fixture, member_id: MemberId) -> usize {
        fx.store
            .list_periods(&member_id)
            .await
            .unwrap()
            .iter()
            .filter(|v| v.period.status == PeriodStatus::Active)
            .count()
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Plan switch
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn switch_blocked_while_due_then_allowed_after_payment() {
        let fx = Fixture::new();
        let plan_a = fx.plan("Plan A", "1000", 30).await;
        let plan_b = fx.plan("Plan B", "2500", 90).await;
        let id = fx.member(&plan_a, "sam@gym.test", "400").await;

        let switch = UpdateMemberCommand {
            member_id: id,
            plan_id: Some(plan_b.id),
            ..Default::default()
        };

        let err = handler(&fx).handle(switch.clone()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadRequest);
        assert_eq!(err, MembershipError::outstanding_due(dec("600")));

        pay(&fx, id, "600").await;
        let result = handler(&fx).handle(switch).await.unwrap();

        let MemberChange::Switched {
            rollover,
            plan_change,
        } = result.change
        else {
            panic!("expected a plan switch");
        };
        assert_eq!(rollover.opened.kind, PeriodKind::PlanSwitch);
        assert_eq!(rollover.opened.fees_paid, Decimal::ZERO);
        assert_eq!(rollover.opened.due_amount, dec("2500"));
        assert_eq!(rollover.closed.unwrap().status, PeriodStatus::Completed);
        assert_eq!(plan_change.from_plan_id, Some(plan_a.id));
        assert_eq!(plan_change.to_plan_id, plan_b.id);

        assert_eq!(result.member.plan_id, plan_b.id);
        assert_eq!(result.member.fees_paid, Decimal::ZERO);
        assert_eq!(result.member.due_amount, dec("2500"));
        assert_eq!(result.member.start_date, today());
        assert_eq!(result.member.end_date, today() + Duration::days(90));

        let history = fx.store.list_plan_changes(&id).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(active_periods(&fx, id).await, 1);
    }

    #[tokio::test]
    async fn blocked_switch_writes_nothing() {
        let fx = Fixture::new();
        let plan_a = fx.plan("Plan A", "1000", 30).await;
        let plan_b = fx.plan("Plan B", "2500", 90).await;
        let id = fx.member(&plan_a, "sam@gym.test", "400").await;

        let _ = handler(&fx)
            .handle(UpdateMemberCommand {
                member_id: id,
                plan_id: Some(plan_b.id),
                name: Some("Renamed".into()),
                ..Default::default()
            })
            .await;

        let view = fx.store.get_member(&id).await.unwrap().unwrap();
        assert_eq!(view.member.name, "Priya");
        assert_eq!(view.plan.id, plan_a.id);
        assert_eq!(fx.store.all_periods().await.len(), 1);
    }

    #[tokio::test]
    async fn price_raise_on_current_plan_blocks_switch() {
        let fx = Fixture::new();
        let mut plan_a = fx.plan("Plan A", "1000", 30).await;
        let plan_b = fx.plan("Plan B", "2500", 90).await;
        let id = fx.member(&plan_a, "sam@gym.test", "1000").await;

        plan_a
            .apply(
                PlanChanges {
                    price: Some(dec("1200")),
                    ..Default::default()
                },
                fx.clock().now(),
            )
            .unwrap();
        PlanRepository::update(&fx.store, &plan_a).await.unwrap();

        let err = handler(&fx)
            .handle(UpdateMemberCommand {
                member_id: id,
                plan_id: Some(plan_b.id),
                ..Default::default()
            })
            .await
            .unwrap_err();

        assert_eq!(err, MembershipError::outstanding_due(dec("200")));
        assert!(fx.store.list_plan_changes(&id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn switch_to_plan_running_off_the_calendar_is_bad_request() {
        let fx = Fixture::new();
        let plan_a = fx.plan("Plan A", "1000", 30).await;
        let endless = fx.plan("Endless", "10", 100_000_000).await;
        let id = fx.member(&plan_a, "sam@gym.test", "1000").await;

        let err = handler(&fx)
            .handle(UpdateMemberCommand {
                member_id: id,
                plan_id: Some(endless.id),
                ..Default::default()
            })
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::BadRequest);
        assert!(matches!(
            err,
            MembershipError::ValidationFailed { ref field, .. } if field == "durationDays"
        ));
        assert_eq!(active_periods(&fx, id).await, 1);
    }

    #[tokio::test]
    async fn explicit_end_date_skips_plan_duration() {
        let fx = Fixture::new();
        let plan_a = fx.plan("Plan A", "1000", 30).await;
        let endless = fx.plan("Endless", "10", 100_000_000).await;
        let id = fx.member(&plan_a, "sam@gym.test", "1000").await;

        let result = handler(&fx)
            .handle(UpdateMemberCommand {
                member_id: id,
                plan_id: Some(endless.id),
                end_date: Some(today() + Duration::days(365)),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(result.member.plan_id, endless.id);
        assert_eq!(result.member.end_date, today() + Duration::days(365));
    }

    #[tokio::test]
    async fn switch_to_unknown_plan_is_not_found() {
        let fx = Fixture::new();
        let plan = fx.plan("Plan A", "1000", 30).await;
        let id = fx.member(&plan, "sam@gym.test", "1000").await;

        let err = handler(&fx)
            .handle(UpdateMemberCommand {
                member_id: id,
                plan_id: Some(PlanId::new()),
                ..Default::default()
            })
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn switch_sends_plan_change_notification() {
        let fx = Fixture::new();
        let plan_a = fx.plan("Plan A", "1000", 30).await;
        let plan_b = fx.plan("Plan B", "2500", 90).await;
        let id = fx.member(&plan_a, "sam@gym.test", "1000").await;
        fx.settle().await;

        handler(&fx)
            .handle(UpdateMemberCommand {
                member_id: id,
                plan_id: Some(plan_b.id),
                ..Default::default()
            })
            .await
            .unwrap();
        fx.settle().await;

        let sent = fx.notifier.sent();
        assert_eq!(sent.len(), 2);
        match &sent[1] {
            Notification::PlanChanged(n) => {
                assert_eq!(n.from_plan, "Plan A");
                assert_eq!(n.to_plan, "Plan B");
            }
            other => panic!("unexpected notification {:?}", other),
        }
    }

    #[tokio::test]
    async fn failed_plan_change_insert_rolls_back_switch() {
        let fx = Fixture::new();
        let plan_a = fx.plan("Plan A", "1000", 30).await;
        let plan_b = fx.plan("Plan B", "2500", 90).await;
        let id = fx.member(&plan_a, "sam@gym.test", "1000").await;
        fx.store.fail_next(FailPoint::InsertPlanChange);

        let result = handler(&fx)
            .handle(UpdateMemberCommand {
                member_id: id,
                plan_id: Some(plan_b.id),
                ..Default::default()
            })
            .await;

        assert!(result.is_err());
        let periods = fx.store.all_periods().await;
        assert_eq!(periods.len(), 1);
        assert!(periods[0].is_active());
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Renewal
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn renewal_opens_unpaid_period_and_resets_fees() {
        let fx = Fixture::new();
        let plan = fx.plan("Plan A", "1000", 30).await;
        let id = fx.member(&plan, "sam@gym.test", "1000").await;

        let new_start = today() + Duration::days(30);
        let new_end = today() + Duration::days(60);
        let result = handler(&fx)
            .handle(UpdateMemberCommand {
                member_id: id,
                plan_id: Some(plan.id),
                start_date: Some(new_start),
                end_date: Some(new_end),
                fees_paid: Some(dec("999")),
                ..Default::default()
            })
            .await
            .unwrap();

        let MemberChange::Renewed(rollover) = result.change else {
            panic!("expected a renewal");
        };
        assert_eq!(rollover.opened.kind, PeriodKind::Renewal);
        assert_eq!(rollover.opened.fees_paid, Decimal::ZERO);
        assert_eq!(rollover.closed.unwrap().status, PeriodStatus::Completed);
        assert_eq!(result.member.fees_paid, Decimal::ZERO);
        assert_eq!(result.member.due_amount, dec("1000"));
        assert_eq!(result.member.end_date, new_end);
        assert_eq!(result.member.balance_days, 30);
        assert_eq!(active_periods(&fx, id).await, 1);
        assert!(fx.store.list_plan_changes(&id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn renewal_with_only_end_date_keeps_start() {
        let fx = Fixture::new();
        let plan = fx.plan("Plan A", "1000", 30).await;
        let id = fx.member(&plan, "sam@gym.test", "0").await;

        let result = handler(&fx)
            .handle(UpdateMemberCommand {
                member_id: id,
                end_date: Some(today() + Duration::days(5)),
                ..Default::default()
            })
            .await
            .unwrap();

        assert!(matches!(result.change, MemberChange::Renewed(_)));
        assert_eq!(result.member.start_date, today());
        assert_eq!(result.member.status, MemberStatus::SoonToExpire);
    }

    #[tokio::test]
    async fn unchanged_dates_are_not_a_renewal() {
        let fx = Fixture::new();
        let plan = fx.plan("Plan A", "1000", 30).await;
        let id = fx.member(&plan, "sam@gym.test", "200").await;

        let result = handler(&fx)
            .handle(UpdateMemberCommand {
                member_id: id,
                start_date: Some(today()),
                end_date: Some(today() + Duration::days(30)),
                name: Some("Sam".into()),
                fees_paid: Some(dec("5000")),
                ..Default::default()
            })
            .await
            .unwrap();

        assert!(matches!(result.change, MemberChange::ProfileOnly));
        assert_eq!(result.member.name, "Sam");
        assert_eq!(result.member.fees_paid, dec("200"));
        assert_eq!(fx.store.all_periods().await.len(), 1);
    }

    #[tokio::test]
    async fn renewal_reverses_dates_is_bad_request() {
        let fx = Fixture::new();
        let plan = fx.plan("Plan A", "1000", 30).await;
        let id = fx.member(&plan, "sam@gym.test", "0").await;

        let err = handler(&fx)
            .handle(UpdateMemberCommand {
                member_id: id,
                start_date: Some(today() + Duration::days(10)),
                end_date: Some(today()),
                ..Default::default()
            })
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::BadRequest);
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Profile / uniqueness
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn unknown_member_is_not_found() {
        let fx = Fixture::new();

        let err = handler(&fx)
            .handle(UpdateMemberCommand {
                member_id: MemberId::new(),
                ..Default::default()
            })
            .await
            .unwrap_err();

        assert!(matches!(err, MembershipError::MemberNotFound(_)));
    }

    #[tokio::test]
    async fn taking_another_members_email_is_conflict() {
        let fx = Fixture::new();
        let plan = fx.plan("Plan A", "1000", 30).await;
        fx.member(&plan, "first@gym.test", "0").await;
        let second = fx.member(&plan, "second@gym.test", "0").await;

        let err = handler(&fx)
            .handle(UpdateMemberCommand {
                member_id: second,
                email: Some("first@gym.test".into()),
                ..Default::default()
            })
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Conflict);
    }

    #[tokio::test]
    async fn keeping_own_email_is_fine() {
        let fx = Fixture::new();
        let plan = fx.plan("Plan A", "1000", 30).await;
        let id = fx.member(&plan, "me@gym.test", "0").await;

        let result = handler(&fx)
            .handle(UpdateMemberCommand {
                member_id: id,
                email: Some("me@gym.test".into()),
                age: Some(44),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(result.member.age, 44);
    }
}
