//! PostgreSQL implementation of CheckinRepository.

use async_trait::async_trait;
use sqlx::PgPool;

use super::rows::{db_error, CheckinRow, CHECKIN_COLUMNS};
use crate::domain::checkin::Checkin;
use crate::domain::foundation::{DomainError, MemberId};
use crate::ports::CheckinRepository;

pub struct PostgresCheckinRepository {
    pool: PgPool,
}

impl PostgresCheckinRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CheckinRepository for PostgresCheckinRepository {
    async fn save(&self, checkin: &Checkin) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO checkins (id, member_id, checked_in_at, checked_out_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(checkin.id.as_uuid())
        .bind(checkin.member_id.as_uuid())
        .bind(checkin.checked_in_at.as_datetime())
        .bind(checkin.checked_out_at.map(|t| *t.as_datetime()))
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.constraint() == Some("checkins_one_open_per_member") {
                    return DomainError::duplicate("member_id", checkin.member_id.to_string());
                }
            }
            db_error("save check-in", e)
        })?;

        Ok(())
    }

    async fn update(&self, checkin: &Checkin) -> Result<(), DomainError> {
        sqlx::query("UPDATE checkins SET checked_out_at = $2 WHERE id = $1")
            .bind(checkin.id.as_uuid())
            .bind(checkin.checked_out_at.map(|t| *t.as_datetime()))
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("update check-in", e))?;

        Ok(())
    }

    async fn find_open(&self, member_id: &MemberId) -> Result<Option<Checkin>, DomainError> {
        let row: Option<CheckinRow> = sqlx::query_as(&format!(
            "SELECT {} FROM checkins WHERE member_id = $1 AND checked_out_at IS NULL",
            CHECKIN_COLUMNS
        ))
        .bind(member_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("fetch open check-in", e))?;

        Ok(row.map(Checkin::from))
    }

    async fn list_for_member(&self, member_id: &MemberId) -> Result<Vec<Checkin>, DomainError> {
        let rows: Vec<CheckinRow> = sqlx::query_as(&format!(
            "SELECT {} FROM checkins WHERE member_id = $1 ORDER BY checked_in_at DESC",
            CHECKIN_COLUMNS
        ))
        .bind(member_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("list check-ins", e))?;

        Ok(rows.into_iter().map(Checkin::from).collect())
    }
}
