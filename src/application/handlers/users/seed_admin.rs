//! SeedAdminHandler - Ensures the first admin account exists at startup.

use std::sync::Arc;

use crate::domain::foundation::Role;
use crate::domain::user::{normalize_email, UserError};
use crate::ports::{Clock, PasswordHasher, UserRepository};

use super::create_user::{CreateUserCommand, CreateUserHandler};

#[derive(Clone)]
pub struct SeedAdminCommand {
    pub email: String,
    pub password: String,
}

pub struct SeedAdminHandler {
    users: Arc<dyn UserRepository>,
    create: CreateUserHandler,
}

impl SeedAdminHandler {
    pub fn new(
        users: Arc<dyn UserRepository>,
        hasher: Arc<dyn PasswordHasher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            create: CreateUserHandler::new(users.clone(), hasher, clock),
            users,
        }
    }

    /// Returns true when the account was created, false when it already existed.
    /// An existing account keeps its password and role.
    pub async fn handle(&self, cmd: SeedAdminCommand) -> Result<bool, UserError> {
        let email = normalize_email(&cmd.email)?;
        if self.users.find_by_email(&email).await?.is_some() {
            tracing::debug!("admin account already present, skipping seed");
            return Ok(false);
        }

        let admin = self
            .create
            .handle(CreateUserCommand {
                email,
                password: cmd.password,
                role: Role::Admin,
            })
            .await?;
        tracing::info!(user_id = %admin.id, "seeded admin account");
        Ok(true)
    }
}
