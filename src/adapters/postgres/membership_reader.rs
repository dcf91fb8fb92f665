//! PostgreSQL implementation of MembershipReader.
//!
//! Listing and dashboard queries run straight against the pool without locks.

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

use super::rows::{
    db_error, to_count, MemberWithPlanRow, PaymentRow, PeriodRow, PlanChangeRow, PlanRow,
    MEMBER_WITH_PLAN_SELECT, PAYMENT_COLUMNS,
};
use crate::domain::foundation::{DomainError, MemberId, PeriodId};
use crate::domain::membership::{MembershipPeriod, Payment, Plan};
use crate::ports::{
    DashboardStats, MemberFilter, MemberView, MembershipReader, Page, PageRequest, PeriodView,
    PlanChangeView,
};

/// Expired first, then soon-to-expire, then active.
const LISTING_ORDER: &str = r#"
    ORDER BY CASE m.status
                 WHEN 'expired' THEN 0
                 WHEN 'soon_to_expire' THEN 1
                 ELSE 2
             END,
             m.updated_at DESC,
             m.created_at DESC
"#;

/// Both optional filters; `NULL` disables a criterion.
const LISTING_FILTER: &str = r#"
    WHERE ($1::text IS NULL OR m.status = $1)
      AND ($2::text IS NULL OR strpos(lower(m.name), lower($2)) > 0)
"#;

pub struct PostgresMembershipReader {
    pool: PgPool,
}

impl PostgresMembershipReader {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct PeriodWithPlanRow {
    #[sqlx(flatten)]
    period: PeriodRow,
    plan_name: String,
    plan_duration_days: i32,
    plan_features: Option<String>,
    plan_is_active: bool,
    plan_current_price: Decimal,
    plan_created_at: chrono::DateTime<chrono::Utc>,
    plan_updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, sqlx::FromRow)]
struct StatsRow {
    active: i64,
    expired: i64,
    soon_to_expire: i64,
    upcoming_expiries: i64,
}

#[async_trait]
impl MembershipReader for PostgresMembershipReader {
    async fn get_member(&self, id: &MemberId) -> Result<Option<MemberView>, DomainError> {
        let row: Option<MemberWithPlanRow> =
            sqlx::query_as(&format!("{} WHERE m.id = $1", MEMBER_WITH_PLAN_SELECT))
                .bind(id.as_uuid())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| db_error("fetch member", e))?;

        row.map(MemberView::try_from).transpose()
    }

    async fn list_members(
        &self,
        filter: &MemberFilter,
        page: PageRequest,
    ) -> Result<Page<MemberView>, DomainError> {
        let status = filter.status.map(|s| s.as_str());
        let name = filter.name.as_deref();

        let total: i64 =
            sqlx::query_scalar(&format!("SELECT COUNT(*) FROM members m {}", LISTING_FILTER))
                .bind(status)
                .bind(name)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| db_error("count members", e))?;

        let rows: Vec<MemberWithPlanRow> = sqlx::query_as(&format!(
            "{} {} {} LIMIT $3 OFFSET $4",
            MEMBER_WITH_PLAN_SELECT, LISTING_FILTER, LISTING_ORDER
        ))
        .bind(status)
        .bind(name)
        .bind(i64::from(page.limit))
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("list members", e))?;

        let data = rows
            .into_iter()
            .map(MemberView::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Page {
            data,
            total: to_count(total),
            page: page.page,
            limit: page.limit,
        })
    }

    async fn list_payments(
        &self,
        member_id: &MemberId,
        page: Option<PageRequest>,
    ) -> Result<Page<Payment>, DomainError> {
        let base = format!(
            "SELECT {} FROM payments WHERE member_id = $1 ORDER BY paid_on DESC, created_at DESC",
            PAYMENT_COLUMNS
        );

        let Some(page) = page else {
            let rows: Vec<PaymentRow> = sqlx::query_as(&base)
                .bind(member_id.as_uuid())
                .fetch_all(&self.pool)
                .await
                .map_err(|e| db_error("list payments", e))?;
            let payments = rows
                .into_iter()
                .map(Payment::try_from)
                .collect::<Result<Vec<_>, _>>()?;
            return Ok(Page::unpaged(payments));
        };

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM payments WHERE member_id = $1")
            .bind(member_id.as_uuid())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("count payments", e))?;

        let rows: Vec<PaymentRow> = sqlx::query_as(&format!("{} LIMIT $2 OFFSET $3", base))
            .bind(member_id.as_uuid())
            .bind(i64::from(page.limit))
            .bind(page.offset() as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("list payments", e))?;

        let data = rows
            .into_iter()
            .map(Payment::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Page {
            data,
            total: to_count(total),
            page: page.page,
            limit: page.limit,
        })
    }

    async fn list_periods(&self, member_id: &MemberId) -> Result<Vec<PeriodView>, DomainError> {
        let rows: Vec<PeriodWithPlanRow> = sqlx::query_as(
            r#"
            SELECT mp.id, mp.member_id, mp.plan_id, mp.start_date, mp.end_date, mp.plan_price,
                   mp.fees_paid, mp.due_amount, mp.status, mp.period_type,
                   mp.created_at, mp.updated_at,
                   p.name AS plan_name, p.duration_days AS plan_duration_days,
                   p.features AS plan_features, p.is_active AS plan_is_active,
                   p.price AS plan_current_price,
                   p.created_at AS plan_created_at, p.updated_at AS plan_updated_at
            FROM membership_periods mp
            JOIN plans p ON p.id = mp.plan_id
            WHERE mp.member_id = $1
            ORDER BY mp.created_at DESC
            "#,
        )
        .bind(member_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("list periods", e))?;

        let payment_rows: Vec<PaymentRow> = sqlx::query_as(&format!(
            "SELECT {} FROM payments WHERE member_id = $1 ORDER BY paid_on DESC, created_at DESC",
            PAYMENT_COLUMNS
        ))
        .bind(member_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("list period payments", e))?;

        let mut payments_by_period: HashMap<PeriodId, Vec<Payment>> = HashMap::new();
        for row in payment_rows {
            let payment = Payment::try_from(row)?;
            payments_by_period
                .entry(payment.period_id)
                .or_default()
                .push(payment);
        }

        rows.into_iter()
            .map(|row| {
                let plan = Plan::from(PlanRow {
                    id: row.period.plan_id,
                    name: row.plan_name,
                    price: row.plan_current_price,
                    duration_days: row.plan_duration_days,
                    features: row.plan_features,
                    is_active: row.plan_is_active,
                    created_at: row.plan_created_at,
                    updated_at: row.plan_updated_at,
                });
                let period = MembershipPeriod::try_from(row.period)?;
                let payments = payments_by_period.remove(&period.id).unwrap_or_default();
                Ok(PeriodView {
                    period,
                    plan,
                    payments,
                })
            })
            .collect()
    }

    async fn list_plan_changes(
        &self,
        member_id: &MemberId,
    ) -> Result<Vec<PlanChangeView>, DomainError> {
        let rows: Vec<PlanChangeRow> = sqlx::query_as(
            r#"
            SELECT pc.id, pc.member_id, pc.from_plan_id, fp.name AS from_plan_name,
                   pc.to_plan_id, tp.name AS to_plan_name, pc.changed_at
            FROM plan_changes pc
            LEFT JOIN plans fp ON fp.id = pc.from_plan_id
            JOIN plans tp ON tp.id = pc.to_plan_id
            WHERE pc.member_id = $1
            ORDER BY pc.changed_at DESC
            "#,
        )
        .bind(member_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("list plan changes", e))?;

        Ok(rows.into_iter().map(PlanChangeView::from).collect())
    }

    async fn find_expiry_candidates(&self, today: NaiveDate) -> Result<Vec<MemberId>, DomainError> {
        let ids: Vec<Uuid> = sqlx::query_scalar(
            "SELECT id FROM members WHERE end_date <= $1 AND status <> 'expired'",
        )
        .bind(today)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("find expiry candidates", e))?;

        Ok(ids.into_iter().map(MemberId::from_uuid).collect())
    }

    async fn find_soon_to_expire_candidates(
        &self,
        today: NaiveDate,
        until: NaiveDate,
    ) -> Result<Vec<MemberId>, DomainError> {
        let ids: Vec<Uuid> = sqlx::query_scalar(
            r#"
            SELECT id FROM members
            WHERE status = 'active' AND end_date > $1 AND end_date <= $2
            "#,
        )
        .bind(today)
        .bind(until)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("find soon-to-expire candidates", e))?;

        Ok(ids.into_iter().map(MemberId::from_uuid).collect())
    }

    async fn dashboard_stats(
        &self,
        today: NaiveDate,
        until: NaiveDate,
    ) -> Result<DashboardStats, DomainError> {
        let counts: StatsRow = sqlx::query_as(
            r#"
            SELECT
                COUNT(*) FILTER (WHERE status = 'active') AS active,
                COUNT(*) FILTER (WHERE status = 'expired') AS expired,
                COUNT(*) FILTER (WHERE status = 'soon_to_expire') AS soon_to_expire,
                COUNT(*) FILTER (WHERE end_date >= $1 AND end_date <= $2) AS upcoming_expiries
            FROM members
            "#,
        )
        .bind(today)
        .bind(until)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("compute dashboard counts", e))?;

        let total_fees: Decimal =
            sqlx::query_scalar("SELECT COALESCE(SUM(amount), 0) FROM payments")
                .fetch_one(&self.pool)
                .await
                .map_err(|e| db_error("sum payments", e))?;

        Ok(DashboardStats {
            active: to_count(counts.active),
            expired: to_count(counts.expired),
            soon_to_expire: to_count(counts.soon_to_expire),
            total_fees,
            upcoming_expiries: to_count(counts.upcoming_expiries),
        })
    }
}
