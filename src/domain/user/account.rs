//! Staff user entity.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Role, Timestamp, UserId, ValidationError};

/// Shortest password accepted for a new account.
pub const MIN_PASSWORD_LEN: usize = 6;

/// A person who can sign in and act with `role`.
///
/// `password_hash` is a PHC string and is never serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffUser {
    pub id: UserId,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub role: Role,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl StaffUser {
    /// Creates an account from an already hashed password.
    pub fn new(
        email: &str,
        password_hash: String,
        role: Role,
        now: Timestamp,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            id: UserId::generate(),
            email: normalize_email(email)?,
            password_hash,
            role,
            created_at: now,
            updated_at: now,
        })
    }
}

/// Trims and lowercases an address, rejecting anything without a local
/// part and a domain.
pub fn normalize_email(raw: &str) -> Result<String, ValidationError> {
    let email = raw.trim().to_lowercase();
    if email.is_empty() {
        return Err(ValidationError::empty_field("email"));
    }
    let well_formed = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.contains('@')
        }
        None => false,
    };
    if !well_formed {
        return Err(ValidationError::invalid_format("email", "not an email address"));
    }
    Ok(email)
}

/// Rejects passwords shorter than `MIN_PASSWORD_LEN` characters.
pub fn check_password_strength(password: &str) -> Result<(), ValidationError> {
    let len = password.chars().count();
    if len < MIN_PASSWORD_LEN {
        return Err(ValidationError::out_of_range(
            "password",
            MIN_PASSWORD_LEN as i64,
            i64::MAX,
            len as i64,
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_is_trimmed_and_lowercased() {
        assert_eq!(normalize_email("  Desk@Gym.Test ").unwrap(), "desk@gym.test");
    }

    #[test]
    fn malformed_emails_are_rejected() {
        for raw in ["", "desk", "@gym.test", "desk@", "desk@gym", "a@b@gym.test"] {
            assert!(normalize_email(raw).is_err(), "{raw} should be rejected");
        }
    }

    #[test]
    fn short_password_is_out_of_range() {
        let err = check_password_strength("12345").unwrap_err();
        assert_eq!(err.field(), "password");
        assert!(check_password_strength("123456").is_ok());
    }

    #[test]
    fn hash_is_not_serialized() {
        let user = StaffUser::new(
            "desk@gym.test",
            "$argon2id$v=19$secret".to_string(),
            Role::GymManager,
            Timestamp::now(),
        )
        .unwrap();

        let json = serde_json::to_value(&user).unwrap();

        assert_eq!(json["email"], "desk@gym.test");
        assert_eq!(json["role"], "gym_manager");
        assert!(json.get("passwordHash").is_none());
    }
}
