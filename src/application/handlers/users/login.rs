//! LoginHandler - Exchanges staff credentials for an access token.

use std::sync::Arc;

use crate::domain::user::{normalize_email, UserError};
use crate::ports::{AccessToken, PasswordHasher, TokenIssuer, UserRepository};

/// Credentials as submitted.
#[derive(Clone)]
pub struct LoginCommand {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for LoginCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginCommand")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

pub struct LoginHandler {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
    issuer: Arc<dyn TokenIssuer>,
}

impl LoginHandler {
    pub fn new(
        users: Arc<dyn UserRepository>,
        hasher: Arc<dyn PasswordHasher>,
        issuer: Arc<dyn TokenIssuer>,
    ) -> Self {
        Self {
            users,
            hasher,
            issuer,
        }
    }

    /// Unknown email and wrong password both yield `InvalidCredentials`.
    pub async fn handle(&self, cmd: LoginCommand) -> Result<AccessToken, UserError> {
        if cmd.password.is_empty() {
            return Err(UserError::validation("password", "password is required"));
        }
        let email = normalize_email(&cmd.email)?;

        let Some(user) = self.users.find_by_email(&email).await? else {
            tracing::info!("login rejected: unknown email");
            return Err(UserError::InvalidCredentials);
        };
        if !self.hasher.verify(&cmd.password, &user.password_hash).await {
            tracing::info!(user_id = %user.id, "login rejected: wrong password");
            return Err(UserError::InvalidCredentials);
        }

        let token = self.issuer.issue(&user)?;
        tracing::info!(user_id = %user.id, role = %user.role, "staff user logged in");
        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::{Fixture, PlainHasher, StaticTokenIssuer};
    use crate::domain::foundation::{Role, Timestamp};
    use crate::domain::membership::ErrorKind;
    use crate::domain::user::StaffUser;

    async fn with_account(fx: &Fixture) -> StaffUser {
        let user = StaffUser::new(
            "desk@gym.test",
            "plain:front-desk".to_string(),
            Role::GymManager,
            Timestamp::now(),
        )
        .unwrap();
        UserRepository::save(&fx.store, &user).await.unwrap();
        user
    }

    fn handler(fx: &Fixture) -> LoginHandler {
        LoginHandler::new(
            Arc::new(fx.store.clone()),
            Arc::new(PlainHasher),
            Arc::new(StaticTokenIssuer),
        )
    }

    fn login(email: &str, password: &str) -> LoginCommand {
        LoginCommand {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn right_password_issues_token_for_that_user() {
        let fx = Fixture::new();
        let user = with_account(&fx).await;

        let token = handler(&fx)
            .handle(login("Desk@Gym.test", "front-desk"))
            .await
            .unwrap();

        assert_eq!(token.access_token, format!("token-for-{}", user.id));
        assert_eq!(token.token_type, "Bearer");
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_email_look_the_same() {
        let fx = Fixture::new();
        with_account(&fx).await;

        let wrong = handler(&fx)
            .handle(login("desk@gym.test", "guess"))
            .await
            .unwrap_err();
        let unknown = handler(&fx)
            .handle(login("nobody@gym.test", "front-desk"))
            .await
            .unwrap_err();

        assert_eq!(wrong, UserError::InvalidCredentials);
        assert_eq!(unknown, UserError::InvalidCredentials);
        assert_eq!(wrong.kind(), ErrorKind::Unauthorized);
    }

    #[tokio::test]
    async fn empty_password_is_bad_request() {
        let fx = Fixture::new();

        let err = handler(&fx).handle(login("desk@gym.test", "")).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::BadRequest);
    }

    #[test]
    fn debug_output_hides_the_password() {
        let shown = format!("{:?}", login("desk@gym.test", "front-desk"));
        assert!(!shown.contains("front-desk"));
    }
}
