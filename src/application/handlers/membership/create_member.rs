//! CreateMemberHandler - Command handler for enrolling a new member.

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::domain::foundation::PlanId;
use crate::domain::membership::{
    Member, MemberProfile, MemberStatus, MembershipError, MembershipPeriod, Payment,
    PaymentMethod,
};
use crate::ports::{Clock, Notification, Notifier, UnitOfWork, WelcomeNotice};

use super::notifications::dispatch;
use super::period_ledger::PeriodLedger;

/// Command to enroll a member.
#[derive(Debug, Clone)]
pub struct CreateMemberCommand {
    pub name: String,
    pub age: i32,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub plan_id: PlanId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Amount collected at enrollment; recorded as the first payment.
    pub fees_paid: Decimal,
    pub status: Option<MemberStatus>,
    pub balance_days: Option<i32>,
    pub payment_method: Option<PaymentMethod>,
}

/// Result of a successful enrollment.
#[derive(Debug, Clone)]
pub struct CreateMemberResult {
    pub member: Member,
    pub period: MembershipPeriod,
    pub payment: Option<Payment>,
}

/// Handler for enrolling members.
///
/// Member, initial period and initial payment are written in one
/// transaction. The welcome notification goes out after commit.
pub struct CreateMemberHandler {
    uow: Arc<dyn UnitOfWork>,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
}

impl CreateMemberHandler {
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
        cmd: CreateMemberCommand,
    ) -> Result<CreateMemberResult, MembershipError> {
        let now = self.clock.now();
        let today = now.date();

        // 1. Validate input
        let profile = MemberProfile::new(cmd.name, cmd.age, cmd.phone, cmd.email)?;
        if cmd.fees_paid < Decimal::ZERO {
            return Err(MembershipError::validation("feesPaid", "must not be negative"));
        }
        if cmd.end_date < cmd.start_date {
            return Err(MembershipError::validation("endDate", "must not be before startDate"));
        }

        let mut tx = self.uow.begin().await?;

        // 2. Contact uniqueness
        if let Some(email) = &profile.email {
            if tx.find_member_by_email(email).await?.is_some() {
                return Err(MembershipError::duplicate_contact("email", email.clone()));
            }
        }
        if let Some(phone) = &profile.phone {
            if tx.find_member_by_phone(phone).await?.is_some() {
                return Err(MembershipError::duplicate_contact("phone", phone.clone()));
            }
        }

        // 3. Plan
        let plan = tx
            .find_plan(&cmd.plan_id)
            .await?
            .ok_or(MembershipError::PlanNotFound(cmd.plan_id))?;

        // 4. Member and initial period
        let member = Member::enroll(
            profile,
            &plan,
            cmd.start_date,
            cmd.end_date,
            cmd.fees_paid,
            cmd.status,
            cmd.balance_days,
            today,
            now,
        );
        tx.insert_member(&member).await?;

        let period = PeriodLedger::new(tx.as_mut(), now)
            .open_initial_period(&member, &plan, cmd.start_date, cmd.end_date, cmd.fees_paid)
            .await?;

        // 5. Initial payment
        let payment = if member.fees_paid > Decimal::ZERO {
            let payment = Payment::new(
                member.id,
                period.id,
                member.fees_paid,
                cmd.start_date,
                cmd.payment_method.unwrap_or_default(),
                now,
            )?;
            tx.insert_payment(&payment).await?;
            Some(payment)
        } else {
            None
        };

        tx.commit().await?;

        tracing::info!(
            member_id = %member.id,
            plan_id = %plan.id,
            period_id = %period.id,
            fees_paid = %member.fees_paid,
            due_amount = %member.due_amount,
            "member enrolled"
        );

        // 6. Welcome notification
        if let Some(email) = &member.email {
            dispatch(
                &self.notifier,
                Notification::Welcome(WelcomeNotice {
                    member_id: member.id,
                    email: email.clone(),
                    name: member.name.clone(),
                    age: member.age,
                    phone: member.phone.clone(),
                    plan_name: plan.name.clone(),
                    start_date: member.start_date,
                    end_date: member.end_date,
                    fees_paid: member.fees_paid,
                    status: member.status,
                }),
            );
        }

        Ok(CreateMemberResult {
            member,
            period,
            payment,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::FailPoint;
    use crate::application::handlers::test_support::{dec, today, Fixture, RecordingNotifier};
    use crate::domain::foundation::DomainError;
    use crate::domain::membership::{ErrorKind, PeriodKind};
    use crate::ports::MembershipReader;
    use chrono::Duration;

    #[tokio::test]
    async fn enrolls_member_with_initial_period_and_payment() {
        let fx = Fixture::new();
        let plan = fx.plan("Monthly", "1000", 30).await;

        let result = fx
            .create_handler()
            .handle(fx.create_command(&plan, "priya@gym.test", "400"))
            .await
            .unwrap();

        assert_eq!(result.member.fees_paid, dec("400"));
        assert_eq!(result.member.due_amount, dec("600"));
        assert_eq!(result.member.balance_days, 30);
        assert_eq!(result.member.status, MemberStatus::Active);
        assert_eq!(result.period.kind, PeriodKind::Initial);
        assert_eq!(result.period.due_amount, dec("600"));

        let payment = result.payment.unwrap();
        assert_eq!(payment.amount, dec("400"));
        assert_eq!(payment.paid_on, today());
        assert_eq!(payment.method, PaymentMethod::Cash);
        assert_eq!(payment.period_id, result.period.id);
    }

    #[tokio::test]
    async fn no_payment_recorded_when_nothing_paid() {
        let fx = Fixture::new();
        let plan = fx.plan("Monthly", "1000", 30).await;

        let result = fx
            .create_handler()
            .handle(fx.create_command(&plan, "priya@gym.test", "0"))
            .await
            .unwrap();

        assert!(result.payment.is_none());
        assert!(fx.store.all_payments().await.is_empty());
    }

    #[tokio::test]
    async fn status_derived_from_end_date() {
        let fx = Fixture::new();
        let plan = fx.plan("Weekly", "300", 7).await;
        let mut cmd = fx.create_command(&plan, "priya@gym.test", "0");
        cmd.start_date = today() - Duration::days(20);
        cmd.end_date = today() - Duration::days(1);

        let result = fx.create_handler().handle(cmd).await.unwrap();

        assert_eq!(result.member.status, MemberStatus::Expired);
        assert_eq!(result.member.balance_days, 19);
    }

    #[tokio::test]
    async fn duplicate_email_is_conflict() {
        let fx = Fixture::new();
        let plan = fx.plan("Monthly", "1000", 30).await;
        fx.member(&plan, "same@gym.test", "0").await;

        let err = fx
            .create_handler()
            .handle(fx.create_command(&plan, "same@gym.test", "0"))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert_eq!(err, MembershipError::duplicate_contact("email", "same@gym.test"));
    }

    #[tokio::test]
    async fn duplicate_phone_is_conflict() {
        let fx = Fixture::new();
        let plan = fx.plan("Monthly", "1000", 30).await;
        let mut first = fx.create_command(&plan, "a@gym.test", "0");
        first.phone = Some("555-0100".into());
        fx.create_handler().handle(first).await.unwrap();

        let mut second = fx.create_command(&plan, "b@gym.test", "0");
        second.phone = Some("555-0100".into());
        let err = fx.create_handler().handle(second).await.unwrap_err();

        assert_eq!(err, MembershipError::duplicate_contact("phone", "555-0100"));
    }

    #[tokio::test]
    async fn unknown_plan_is_not_found() {
        let fx = Fixture::new();
        let plan = fx.plan("Monthly", "1000", 30).await;
        let mut cmd = fx.create_command(&plan, "priya@gym.test", "0");
        cmd.plan_id = PlanId::new();

        let err = fx.create_handler().handle(cmd).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn invalid_profile_is_bad_request() {
        let fx = Fixture::new();
        let plan = fx.plan("Monthly", "1000", 30).await;
        let mut cmd = fx.create_command(&plan, "priya@gym.test", "0");
        cmd.age = 0;

        let err = fx.create_handler().handle(cmd).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::BadRequest);
    }

    #[tokio::test]
    async fn failed_payment_insert_rolls_back_member() {
        let fx = Fixture::new();
        let plan = fx.plan("Monthly", "1000", 30).await;
        fx.store.fail_next(FailPoint::InsertPayment);

        let result = fx
            .create_handler()
            .handle(fx.create_command(&plan, "priya@gym.test", "400"))
            .await;

        assert!(matches!(result, Err(MembershipError::Infrastructure(_))));
        assert!(fx.store.all_periods().await.is_empty());
        let page = fx
            .store
            .list_members(&Default::default(), crate::ports::PageRequest::new(None, None))
            .await
            .unwrap();
        assert_eq!(page.total, 0);
    }

    #[tokio::test]
    async fn unique_violation_from_storage_is_conflict() {
        let fx = Fixture::new();
        let plan = fx.plan("Monthly", "1000", 30).await;
        // Another enrollment with the same email commits after our pre-check.
        fx.store.fail_next_with(
            FailPoint::InsertMember,
            DomainError::duplicate("email", "priya@gym.test"),
        );

        let err = fx
            .create_handler()
            .handle(fx.create_command(&plan, "priya@gym.test", "400"))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert_eq!(err, MembershipError::duplicate_contact("email", "priya@gym.test"));
        assert!(fx.store.all_periods().await.is_empty());
        assert!(fx.store.all_payments().await.is_empty());
    }

    #[tokio::test]
    async fn sends_welcome_notification() {
        let fx = Fixture::new();
        let plan = fx.plan("Monthly", "1000", 30).await;

        fx.member(&plan, "priya@gym.test", "0").await;
        fx.settle().await;

        let sent = fx.notifier.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].kind(), "welcome");
        assert_eq!(sent[0].recipient(), "priya@gym.test");
    }

    #[tokio::test]
    async fn notification_failure_does_not_fail_enrollment() {
        let fx = Fixture::with_notifier(RecordingNotifier::failing());
        let plan = fx.plan("Monthly", "1000", 30).await;

        let result = fx
            .create_handler()
            .handle(fx.create_command(&plan, "priya@gym.test", "0"))
            .await;
        fx.settle().await;

        assert!(result.is_ok());
        assert_eq!(fx.notifier.sent().len(), 1);
    }

    #[tokio::test]
    async fn member_without_email_gets_no_notification() {
        let fx = Fixture::new();
        let plan = fx.plan("Monthly", "1000", 30).await;
        let mut cmd = fx.create_command(&plan, "unused@gym.test", "0");
        cmd.email = None;

        fx.create_handler().handle(cmd).await.unwrap();
        fx.settle().await;

        assert!(fx.notifier.sent().is_empty());
    }
}
