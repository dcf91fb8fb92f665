//! PostgreSQL implementation of UnitOfWork.
//!
//! Each `MembershipTransaction` wraps one sqlx transaction. Member rows are
//! locked with `SELECT ... FOR UPDATE` so concurrent writers for the same
//! member serialize. Dropping the transaction without `commit` rolls it back.

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use super::rows::{
    db_error, member_write_error, MemberRow, PaymentRow, PeriodRow, PlanRow, MEMBER_COLUMNS,
    PAYMENT_COLUMNS, PERIOD_COLUMNS, PLAN_COLUMNS,
};
use crate::domain::foundation::{DomainError, ErrorCode, MemberId, PlanId};
use crate::domain::membership::{Member, MembershipPeriod, Payment, Plan, PlanChange};
use crate::ports::{MembershipTransaction, UnitOfWork};

/// Starts PostgreSQL transactions over a pool.
pub struct PostgresUnitOfWork {
    pool: PgPool,
}

impl PostgresUnitOfWork {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UnitOfWork for PostgresUnitOfWork {
    async fn begin(&self) -> Result<Box<dyn MembershipTransaction>, DomainError> {
        let tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("begin transaction", e))?;
        Ok(Box::new(PostgresMembershipTransaction { tx }))
    }
}

/// One open PostgreSQL transaction.
pub struct PostgresMembershipTransaction {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl MembershipTransaction for PostgresMembershipTransaction {
    async fn find_plan(&mut self, id: &PlanId) -> Result<Option<Plan>, DomainError> {
        let row: Option<PlanRow> =
            sqlx::query_as(&format!("SELECT {} FROM plans WHERE id = $1", PLAN_COLUMNS))
                .bind(id.as_uuid())
                .fetch_optional(&mut *self.tx)
                .await
                .map_err(|e| db_error("fetch plan", e))?;

        Ok(row.map(Plan::from))
    }

    async fn find_member_for_update(
        &mut self,
        id: &MemberId,
    ) -> Result<Option<Member>, DomainError> {
        let row: Option<MemberRow> = sqlx::query_as(&format!(
            "SELECT {} FROM members WHERE id = $1 FOR UPDATE",
            MEMBER_COLUMNS
        ))
        .bind(id.as_uuid())
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(|e| db_error("lock member", e))?;

        row.map(Member::try_from).transpose()
    }

    async fn find_member_by_email(&mut self, email: &str) -> Result<Option<MemberId>, DomainError> {
        let id: Option<Uuid> = sqlx::query_scalar("SELECT id FROM members WHERE email = $1")
            .bind(email)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(|e| db_error("look up member by email", e))?;

        Ok(id.map(MemberId::from_uuid))
    }

    async fn find_member_by_phone(&mut self, phone: &str) -> Result<Option<MemberId>, DomainError> {
        let id: Option<Uuid> = sqlx::query_scalar("SELECT id FROM members WHERE phone = $1")
            .bind(phone)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(|e| db_error("look up member by phone", e))?;

        Ok(id.map(MemberId::from_uuid))
    }

    async fn insert_member(&mut self, member: &Member) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO members (
                id, name, age, phone, email, plan_id, start_date, end_date,
                fees_paid, due_amount, status, balance_days, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            "#,
        )
        .bind(member.id.as_uuid())
        .bind(&member.name)
        .bind(member.age)
        .bind(&member.phone)
        .bind(&member.email)
        .bind(member.plan_id.as_uuid())
        .bind(member.start_date)
        .bind(member.end_date)
        .bind(member.fees_paid)
        .bind(member.due_amount)
        .bind(member.status.as_str())
        .bind(member.balance_days)
        .bind(member.created_at.as_datetime())
        .bind(member.updated_at.as_datetime())
        .execute(&mut *self.tx)
        .await
        .map_err(|e| member_write_error("insert member", e, member))?;

        Ok(())
    }

    async fn update_member(&mut self, member: &Member) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE members SET
                name = $2,
                age = $3,
                phone = $4,
                email = $5,
                plan_id = $6,
                start_date = $7,
                end_date = $8,
                fees_paid = $9,
                due_amount = $10,
                status = $11,
                balance_days = $12,
                updated_at = $13
            WHERE id = $1
            "#,
        )
        .bind(member.id.as_uuid())
        .bind(&member.name)
        .bind(member.age)
        .bind(&member.phone)
        .bind(&member.email)
        .bind(member.plan_id.as_uuid())
        .bind(member.start_date)
        .bind(member.end_date)
        .bind(member.fees_paid)
        .bind(member.due_amount)
        .bind(member.status.as_str())
        .bind(member.balance_days)
        .bind(member.updated_at.as_datetime())
        .execute(&mut *self.tx)
        .await
        .map_err(|e| member_write_error("update member", e, member))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::MemberNotFound,
                format!("Member not found: {}", member.id),
            ));
        }

        Ok(())
    }

    async fn find_active_period(
        &mut self,
        member_id: &MemberId,
    ) -> Result<Option<MembershipPeriod>, DomainError> {
        let row: Option<PeriodRow> = sqlx::query_as(&format!(
            "SELECT {} FROM membership_periods WHERE member_id = $1 AND status = 'active'",
            PERIOD_COLUMNS
        ))
        .bind(member_id.as_uuid())
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(|e| db_error("fetch active period", e))?;

        row.map(MembershipPeriod::try_from).transpose()
    }

    async fn insert_period(&mut self, period: &MembershipPeriod) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO membership_periods (
                id, member_id, plan_id, start_date, end_date, plan_price,
                fees_paid, due_amount, status, period_type, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(period.id.as_uuid())
        .bind(period.member_id.as_uuid())
        .bind(period.plan_id.as_uuid())
        .bind(period.start_date)
        .bind(period.end_date)
        .bind(period.plan_price)
        .bind(period.fees_paid)
        .bind(period.due_amount)
        .bind(period.status.as_str())
        .bind(period.kind.as_str())
        .bind(period.created_at.as_datetime())
        .bind(period.updated_at.as_datetime())
        .execute(&mut *self.tx)
        .await
        .map_err(|e| db_error("insert period", e))?;

        Ok(())
    }

    async fn update_period(&mut self, period: &MembershipPeriod) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE membership_periods SET
                start_date = $2,
                end_date = $3,
                fees_paid = $4,
                due_amount = $5,
                status = $6,
                updated_at = $7
            WHERE id = $1
            "#,
        )
        .bind(period.id.as_uuid())
        .bind(period.start_date)
        .bind(period.end_date)
        .bind(period.fees_paid)
        .bind(period.due_amount)
        .bind(period.status.as_str())
        .bind(period.updated_at.as_datetime())
        .execute(&mut *self.tx)
        .await
        .map_err(|e| db_error("update period", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::PeriodNotFound,
                format!("Period not found: {}", period.id),
            ));
        }

        Ok(())
    }

    async fn find_matching_payment(
        &mut self,
        member_id: &MemberId,
        amount: Decimal,
        paid_on: NaiveDate,
    ) -> Result<Option<Payment>, DomainError> {
        let row: Option<PaymentRow> = sqlx::query_as(&format!(
            r#"
            SELECT {} FROM payments
            WHERE member_id = $1 AND amount = $2 AND paid_on = $3
            ORDER BY created_at
            LIMIT 1
            "#,
            PAYMENT_COLUMNS
        ))
        .bind(member_id.as_uuid())
        .bind(amount)
        .bind(paid_on)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(|e| db_error("look up matching payment", e))?;

        row.map(Payment::try_from).transpose()
    }

    async fn insert_payment(&mut self, payment: &Payment) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO payments (id, member_id, period_id, amount, paid_on, method, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(payment.id.as_uuid())
        .bind(payment.member_id.as_uuid())
        .bind(payment.period_id.as_uuid())
        .bind(payment.amount)
        .bind(payment.paid_on)
        .bind(payment.method.as_str())
        .bind(payment.created_at.as_datetime())
        .execute(&mut *self.tx)
        .await
        .map_err(|e| db_error("insert payment", e))?;

        Ok(())
    }

    async fn insert_plan_change(&mut self, change: &PlanChange) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO plan_changes (id, member_id, from_plan_id, to_plan_id, changed_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(change.id.as_uuid())
        .bind(change.member_id.as_uuid())
        .bind(change.from_plan_id.map(|id| *id.as_uuid()))
        .bind(change.to_plan_id.as_uuid())
        .bind(change.changed_at.as_datetime())
        .execute(&mut *self.tx)
        .await
        .map_err(|e| db_error("insert plan change", e))?;

        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), DomainError> {
        self.tx
            .commit()
            .await
            .map_err(|e| db_error("commit transaction", e))
    }
}
