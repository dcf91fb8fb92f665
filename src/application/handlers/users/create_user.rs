//! CreateUserHandler - Command handler for adding a staff account.

use std::sync::Arc;

use crate::domain::foundation::Role;
use crate::domain::user::{check_password_strength, normalize_email, StaffUser, UserError};
use crate::ports::{Clock, PasswordHasher, UserRepository};

/// Command to create a staff account.
#[derive(Debug, Clone)]
pub struct CreateUserCommand {
    pub email: String,
    pub password: String,
    pub role: Role,
}

/// Handler for creating staff accounts.
pub struct CreateUserHandler {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
    clock: Arc<dyn Clock>,
}

impl CreateUserHandler {
    pub fn new(
        users: Arc<dyn UserRepository>,
        hasher: Arc<dyn PasswordHasher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            users,
            hasher,
            clock,
        }
    }

    pub async fn handle(&self, cmd: CreateUserCommand) -> Result<StaffUser, UserError> {
        let email = normalize_email(&cmd.email)?;
        check_password_strength(&cmd.password)?;
        if self.users.find_by_email(&email).await?.is_some() {
            return Err(UserError::DuplicateEmail(email));
        }

        let hash = self.hasher.hash(&cmd.password).await?;
        let user = StaffUser::new(&email, hash, cmd.role, self.clock.now())?;
        // A concurrent create can still win the unique index.
        self.users.save(&user).await?;

        tracing::info!(user_id = %user.id, role = %user.role, "staff user created");
        Ok(user)
    }
}
