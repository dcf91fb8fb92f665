//! PostgreSQL implementation of UserRepository.

use async_trait::async_trait;
use sqlx::PgPool;

use super::rows::{db_error, to_count, UserRow, USER_COLUMNS};
use crate::domain::foundation::DomainError;
use crate::domain::user::StaffUser;
use crate::ports::{Page, PageRequest, UserRepository};

pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn save(&self, user: &StaffUser) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, email, password_hash, role, created_at, updated_at)
            VALUES ($1::uuid, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(user.id.as_str())
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(user.created_at.as_datetime())
        .bind(user.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.constraint() == Some("users_email_key") {
                    return DomainError::duplicate("email", user.email.clone());
                }
            }
            db_error("save user", e)
        })?;

        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<StaffUser>, DomainError> {
        let row: Option<UserRow> =
            sqlx::query_as(&format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS))
                .bind(email)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| db_error("fetch user", e))?;

        row.map(StaffUser::try_from).transpose()
    }

    async fn list(&self, page: PageRequest) -> Result<Page<StaffUser>, DomainError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("count users", e))?;

        let rows: Vec<UserRow> = sqlx::query_as(&format!(
            "SELECT {} FROM users ORDER BY created_at DESC LIMIT $1 OFFSET $2",
            USER_COLUMNS
        ))
        .bind(i64::from(page.limit))
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("list users", e))?;

        let data = rows
            .into_iter()
            .map(StaffUser::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Page {
            data,
            total: to_count(total),
            page: page.page,
            limit: page.limit,
        })
    }
}
