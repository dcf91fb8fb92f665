//! PostgreSQL implementation of PlanRepository.

use async_trait::async_trait;
use sqlx::PgPool;

use super::rows::{db_error, PlanRow, PLAN_COLUMNS};
use crate::domain::foundation::{DomainError, ErrorCode, PlanId};
use crate::domain::membership::Plan;
use crate::ports::PlanRepository;

/// Postgres error code for a foreign key violation.
const FOREIGN_KEY_VIOLATION: &str = "23503";

pub struct PostgresPlanRepository {
    pool: PgPool,
}

impl PostgresPlanRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PlanRepository for PostgresPlanRepository {
    async fn save(&self, plan: &Plan) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO plans (
                id, name, price, duration_days, features, is_active, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(plan.id.as_uuid())
        .bind(&plan.name)
        .bind(plan.price)
        .bind(plan.duration_days)
        .bind(&plan.features)
        .bind(plan.is_active)
        .bind(plan.created_at.as_datetime())
        .bind(plan.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("save plan", e))?;

        Ok(())
    }

    async fn update(&self, plan: &Plan) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE plans SET
                name = $2,
                price = $3,
                duration_days = $4,
                features = $5,
                is_active = $6,
                updated_at = $7
            WHERE id = $1
            "#,
        )
        .bind(plan.id.as_uuid())
        .bind(&plan.name)
        .bind(plan.price)
        .bind(plan.duration_days)
        .bind(&plan.features)
        .bind(plan.is_active)
        .bind(plan.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("update plan", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::PlanNotFound,
                format!("Plan not found: {}", plan.id),
            ));
        }

        Ok(())
    }

    async fn delete(&self, id: &PlanId) -> Result<(), DomainError> {
        sqlx::query("DELETE FROM plans WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db_err) = &e {
                    if db_err.code().as_deref() == Some(FOREIGN_KEY_VIOLATION) {
                        return DomainError::new(
                            ErrorCode::PlanInUse,
                            format!("plan {} is still referenced", id),
                        );
                    }
                }
                db_error("delete plan", e)
            })?;

        Ok(())
    }

    async fn find_by_id(&self, id: &PlanId) -> Result<Option<Plan>, DomainError> {
        let row: Option<PlanRow> =
            sqlx::query_as(&format!("SELECT {} FROM plans WHERE id = $1", PLAN_COLUMNS))
                .bind(id.as_uuid())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| db_error("fetch plan", e))?;

        Ok(row.map(Plan::from))
    }

    async fn list(&self, include_inactive: bool) -> Result<Vec<Plan>, DomainError> {
        let rows: Vec<PlanRow> = sqlx::query_as(&format!(
            "SELECT {} FROM plans WHERE ($1 OR is_active) ORDER BY created_at DESC",
            PLAN_COLUMNS
        ))
        .bind(include_inactive)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("list plans", e))?;

        Ok(rows.into_iter().map(Plan::from).collect())
    }

    async fn count_members_on_plan(&self, id: &PlanId) -> Result<i64, DomainError> {
        sqlx::query_scalar("SELECT COUNT(*) FROM members WHERE plan_id = $1")
            .bind(id.as_uuid())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("count plan members", e))
    }

    async fn count_periods_on_plan(&self, id: &PlanId) -> Result<i64, DomainError> {
        sqlx::query_scalar("SELECT COUNT(*) FROM membership_periods WHERE plan_id = $1")
            .bind(id.as_uuid())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("count plan periods", e))
    }
}
