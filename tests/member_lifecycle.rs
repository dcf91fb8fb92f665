//! Lifecycle scenarios against the in-memory adapters.
//!
//! Each test drives the application handlers end to end: enrollment,
//! payments, renewals, plan switches and the status sweep, then checks the
//! period ledger and the member's cached billing fields agree.

use async_trait::async_trait;
use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use std::sync::{Arc, Mutex};

use gym_membership::adapters::memory::{FailPoint, FixedClock, InMemoryStore};
use gym_membership::application::handlers::{
    CreateMemberCommand, CreateMemberHandler, CreatePlanCommand, CreatePlanHandler,
    GetMemberHandler, GetMemberQuery, GetMembershipPeriodsHandler, GetMembershipPeriodsQuery,
    GetPlanHistoryHandler, GetPlanHistoryQuery, MemberChange, RecordPaymentCommand,
    RecordPaymentHandler, RemovePlanCommand, RemovePlanHandler, RunStatusSweepHandler,
    UpdateMemberCommand, UpdateMemberHandler,
};
use gym_membership::domain::foundation::{DomainError, MemberId};
use gym_membership::domain::membership::{
    ErrorKind, Member, MemberStatus, MembershipError, PeriodKind, PeriodStatus, Plan,
};
use gym_membership::ports::{Clock, Notification, Notifier, PeriodView};

// =============================================================================
// Test Infrastructure
// =============================================================================

struct RecordingNotifier {
    sent: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
        }
    }

    fn count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, notification: &Notification) -> Result<(), DomainError> {
        self.sent.lock().unwrap().push(notification.clone());
        Ok(())
    }
}

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
}

struct Gym {
    store: InMemoryStore,
    clock: Arc<FixedClock>,
    notifier: Arc<RecordingNotifier>,
}

impl Gym {
    fn new() -> Self {
        Self {
            store: InMemoryStore::new(),
            clock: Arc::new(FixedClock::on(today())),
            notifier: Arc::new(RecordingNotifier::new()),
        }
    }

    fn clock(&self) -> Arc<dyn Clock> {
        self.clock.clone()
    }

    async fn plan(&self, name: &str, price: &str, days: i32) -> Plan {
        CreatePlanHandler::new(Arc::new(self.store.clone()), self.clock())
            .handle(CreatePlanCommand {
                name: name.to_string(),
                price: dec(price),
                duration_days: days,
                features: None,
            })
            .await
            .unwrap()
    }

    fn enrollment(&self, plan: &Plan, email: &str, fees_paid: &str) -> CreateMemberCommand {
        CreateMemberCommand {
            name: "Ravi Kumar".to_string(),
            age: 31,
            phone: None,
            email: Some(email.to_string()),
            plan_id: plan.id,
            start_date: today(),
            end_date: today() + Duration::days(i64::from(plan.duration_days)),
            fees_paid: dec(fees_paid),
            status: None,
            balance_days: None,
            payment_method: None,
        }
    }

    async fn enroll(&self, cmd: CreateMemberCommand) -> Result<Member, MembershipError> {
        CreateMemberHandler::new(
            Arc::new(self.store.clone()),
            self.notifier.clone(),
            self.clock(),
        )
        .handle(cmd)
        .await
        .map(|result| result.member)
    }

    async fn update(&self, cmd: UpdateMemberCommand) -> Result<MemberChange, MembershipError> {
        UpdateMemberHandler::new(
            Arc::new(self.store.clone()),
            self.notifier.clone(),
            self.clock(),
        )
        .handle(cmd)
        .await
        .map(|result| result.change)
    }

    async fn pay(&self, member_id: MemberId, amount: &str) -> Result<bool, MembershipError> {
        RecordPaymentHandler::new(Arc::new(self.store.clone()), self.clock())
            .handle(RecordPaymentCommand {
                member_id,
                amount: dec(amount),
                paid_on: None,
                method: None,
            })
            .await
            .map(|result| result.duplicate)
    }

    async fn member(&self, member_id: MemberId) -> Member {
        GetMemberHandler::new(Arc::new(self.store.clone()))
            .handle(GetMemberQuery { member_id })
            .await
            .unwrap()
            .member
    }

    async fn periods(&self, member_id: MemberId) -> Vec<PeriodView> {
        GetMembershipPeriodsHandler::new(Arc::new(self.store.clone()))
            .handle(GetMembershipPeriodsQuery { member_id })
            .await
            .unwrap()
    }

    async fn sweep(&self) -> gym_membership::application::handlers::StatusSweepReport {
        let store = Arc::new(self.store.clone());
        RunStatusSweepHandler::new(store.clone(), store, self.clock())
            .handle()
            .await
            .unwrap()
    }

    async fn settle(&self) {
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
    }
}

fn active_count(periods: &[PeriodView]) -> usize {
    periods
        .iter()
        .filter(|view| view.period.status == PeriodStatus::Active)
        .count()
}

// =============================================================================
// Scenarios
// =============================================================================

#[tokio::test]
async fn plan_switch_is_blocked_until_due_is_cleared() {
    let gym = Gym::new();
    let basic = gym.plan("Basic", "1000", 30).await;
    let premium = gym.plan("Premium", "1800", 90).await;
    let member = gym.enroll(gym.enrollment(&basic, "ravi@gym.test", "400")).await.unwrap();
    assert_eq!(member.due_amount, dec("600"));

    let switch = UpdateMemberCommand {
        member_id: member.id,
        plan_id: Some(premium.id),
        ..Default::default()
    };

    let blocked = gym.update(switch.clone()).await.unwrap_err();
    assert_eq!(blocked.kind(), ErrorKind::BadRequest);
    assert!(matches!(blocked, MembershipError::OutstandingDue { due } if due == dec("600")));

    assert!(!gym.pay(member.id, "600").await.unwrap());
    assert_eq!(gym.member(member.id).await.due_amount, Decimal::ZERO);

    let change = gym.update(switch).await.unwrap();
    assert!(matches!(change, MemberChange::Switched { .. }));

    let after = gym.member(member.id).await;
    assert_eq!(after.plan_id, premium.id);
    assert_eq!(after.fees_paid, Decimal::ZERO);
    assert_eq!(after.due_amount, dec("1800"));

    let periods = gym.periods(member.id).await;
    assert_eq!(periods.len(), 2);
    assert_eq!(active_count(&periods), 1);
    let newest = &periods[0].period;
    assert_eq!(newest.kind, PeriodKind::PlanSwitch);
    assert_eq!(newest.fees_paid, Decimal::ZERO);
    assert_eq!(newest.due_amount, dec("1800"));
    assert_eq!(periods[1].period.status, PeriodStatus::Completed);
    assert_eq!(periods[1].payments.len(), 2);

    let history = GetPlanHistoryHandler::new(Arc::new(gym.store.clone()))
        .handle(GetPlanHistoryQuery {
            member_id: member.id,
        })
        .await
        .unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].from_plan_id, Some(basic.id));
    assert_eq!(history[0].to_plan_name, "Premium");

    gym.settle().await;
    // welcome + plan change
    assert_eq!(gym.notifier.count(), 2);
}

#[tokio::test]
async fn renewal_resets_period_balance() {
    let gym = Gym::new();
    let plan = gym.plan("Monthly", "1000", 30).await;
    let member = gym.enroll(gym.enrollment(&plan, "meera@gym.test", "1000")).await.unwrap();
    assert_eq!(member.due_amount, Decimal::ZERO);

    let new_start = today() + Duration::days(30);
    let change = gym
        .update(UpdateMemberCommand {
            member_id: member.id,
            start_date: Some(new_start),
            end_date: Some(new_start + Duration::days(30)),
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(matches!(change, MemberChange::Renewed(_)));

    let after = gym.member(member.id).await;
    assert_eq!(after.fees_paid, Decimal::ZERO);
    assert_eq!(after.due_amount, dec("1000"));
    assert_eq!(after.end_date, new_start + Duration::days(30));
    assert_eq!(after.status, MemberStatus::Active);

    let periods = gym.periods(member.id).await;
    assert_eq!(active_count(&periods), 1);
    assert_eq!(periods[0].period.kind, PeriodKind::Renewal);
    assert_eq!(periods[0].period.fees_paid, Decimal::ZERO);
    assert_eq!(periods[1].period.status, PeriodStatus::Completed);
    assert_eq!(periods[1].period.fees_paid, dec("1000"));
}

#[tokio::test]
async fn fees_in_update_payload_are_ignored() {
    let gym = Gym::new();
    let plan = gym.plan("Monthly", "1000", 30).await;
    let member = gym.enroll(gym.enrollment(&plan, "anil@gym.test", "200")).await.unwrap();

    let change = gym
        .update(UpdateMemberCommand {
            member_id: member.id,
            name: Some("Anil K".to_string()),
            fees_paid: Some(dec("1000")),
            ..Default::default()
        })
        .await
        .unwrap();

    assert!(matches!(change, MemberChange::ProfileOnly));
    let after = gym.member(member.id).await;
    assert_eq!(after.name, "Anil K");
    assert_eq!(after.fees_paid, dec("200"));
    assert_eq!(after.due_amount, dec("800"));
}

#[tokio::test]
async fn duplicate_email_is_a_conflict() {
    let gym = Gym::new();
    let plan = gym.plan("Monthly", "1000", 30).await;
    gym.enroll(gym.enrollment(&plan, "same@gym.test", "0")).await.unwrap();

    let err = gym
        .enroll(gym.enrollment(&plan, "same@gym.test", "0"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert!(matches!(err, MembershipError::DuplicateContact { ref field, .. } if field == "email"));
}

#[tokio::test]
async fn repeated_payment_is_recorded_once() {
    let gym = Gym::new();
    let plan = gym.plan("Monthly", "1000", 30).await;
    let member = gym.enroll(gym.enrollment(&plan, "dup@gym.test", "0")).await.unwrap();

    assert!(!gym.pay(member.id, "250").await.unwrap());
    assert!(gym.pay(member.id, "250").await.unwrap());

    let after = gym.member(member.id).await;
    assert_eq!(after.fees_paid, dec("250"));
    assert_eq!(after.due_amount, dec("750"));

    let periods = gym.periods(member.id).await;
    assert_eq!(periods[0].payments.len(), 1);
    assert_eq!(periods[0].period.fees_paid, dec("250"));
}

#[tokio::test]
async fn failed_enrollment_leaves_nothing_behind() {
    let gym = Gym::new();
    let plan = gym.plan("Monthly", "1000", 30).await;
    gym.store.fail_next(FailPoint::InsertPayment);

    let err = gym
        .enroll(gym.enrollment(&plan, "rollback@gym.test", "500"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Internal);

    // The email is free again, so nothing was committed.
    let member = gym
        .enroll(gym.enrollment(&plan, "rollback@gym.test", "500"))
        .await
        .unwrap();
    assert_eq!(gym.periods(member.id).await.len(), 1);

    gym.settle().await;
    assert_eq!(gym.notifier.count(), 1);
}

#[tokio::test]
async fn sweep_expires_warns_and_leaves_others() {
    let gym = Gym::new();
    let plan = gym.plan("Monthly", "1000", 30).await;

    let mut lapsed = gym.enrollment(&plan, "lapsed@gym.test", "1000");
    lapsed.start_date = today() - Duration::days(31);
    lapsed.end_date = today() - Duration::days(1);
    lapsed.status = Some(MemberStatus::Active);
    let lapsed = gym.enroll(lapsed).await.unwrap();

    let mut ending = gym.enrollment(&plan, "ending@gym.test", "1000");
    ending.start_date = today() - Duration::days(27);
    ending.end_date = today() + Duration::days(3);
    ending.status = Some(MemberStatus::Active);
    let ending = gym.enroll(ending).await.unwrap();

    let fresh = gym.enroll(gym.enrollment(&plan, "fresh@gym.test", "1000")).await.unwrap();

    let report = gym.sweep().await;
    assert_eq!(report.expired, 1);
    assert_eq!(report.soon_to_expire, 1);
    assert_eq!(report.periods_completed, 1);

    assert_eq!(gym.member(lapsed.id).await.status, MemberStatus::Expired);
    assert_eq!(active_count(&gym.periods(lapsed.id).await), 0);
    assert_eq!(gym.member(ending.id).await.status, MemberStatus::SoonToExpire);
    assert_eq!(gym.member(fresh.id).await.status, MemberStatus::Active);

    assert!(gym.sweep().await.is_noop());
}

#[tokio::test]
async fn sweep_follows_the_clock() {
    let gym = Gym::new();
    let plan = gym.plan("Monthly", "1000", 30).await;
    let member = gym.enroll(gym.enrollment(&plan, "clock@gym.test", "1000")).await.unwrap();

    gym.clock.advance_days(25);
    gym.sweep().await;
    assert_eq!(gym.member(member.id).await.status, MemberStatus::SoonToExpire);

    gym.clock.advance_days(5);
    gym.sweep().await;
    assert_eq!(gym.member(member.id).await.status, MemberStatus::Expired);

    let err = gym.pay(member.id, "100").await.unwrap_err();
    assert!(matches!(err, MembershipError::NoActivePeriod(_)));
}

#[tokio::test]
async fn plan_removal_respects_references() {
    let gym = Gym::new();
    let basic = gym.plan("Basic", "500", 30).await;
    let premium = gym.plan("Premium", "900", 30).await;
    let unused = gym.plan("Trial", "100", 7).await;
    let remover = RemovePlanHandler::new(Arc::new(gym.store.clone()), gym.clock());

    let member = gym.enroll(gym.enrollment(&basic, "plans@gym.test", "500")).await.unwrap();

    let in_use = remover
        .handle(RemovePlanCommand { plan_id: basic.id })
        .await
        .unwrap_err();
    assert_eq!(in_use.kind(), ErrorKind::Conflict);

    gym.update(UpdateMemberCommand {
        member_id: member.id,
        plan_id: Some(premium.id),
        ..Default::default()
    })
    .await
    .unwrap();

    let historical = remover
        .handle(RemovePlanCommand { plan_id: basic.id })
        .await
        .unwrap();
    assert!(!historical.deleted);
    assert!(historical.deactivated);

    let removed = remover
        .handle(RemovePlanCommand { plan_id: unused.id })
        .await
        .unwrap();
    assert!(removed.deleted);
}
