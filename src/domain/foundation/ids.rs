//! Strongly-typed identifier value objects.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::ValidationError;

/// Declares a UUID-backed identifier newtype.
///
/// Each generated type gets `new`, `from_uuid`, `as_uuid`, `Default`,
/// `Display` and `FromStr`, and serializes as a bare UUID string.
macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Creates a new random identifier.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Creates an identifier from an existing UUID.
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the inner UUID.
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

uuid_id!(
    /// Unique identifier for a gym member.
    MemberId
);

uuid_id!(
    /// Unique identifier for a membership plan.
    PlanId
);

uuid_id!(
    /// Unique identifier for a membership (billing) period.
    PeriodId
);

uuid_id!(
    /// Unique identifier for a recorded payment.
    PaymentId
);

uuid_id!(
    /// Unique identifier for a plan change audit record.
    PlanChangeId
);

uuid_id!(
    /// Unique identifier for a check-in.
    CheckinId
);

/// Identifier of an authenticated staff user (the token subject).
///
/// Not a UUID: the value comes from whatever issued the token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Creates a new UserId, returning error if empty.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ValidationError::empty_field("user_id"));
        }
        Ok(Self(id))
    }

    /// A fresh id for an account this service creates.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Returns the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn member_id_generates_unique_values() {
        assert_ne!(MemberId::new(), MemberId::new());
    }

    #[test]
    fn plan_id_parses_from_valid_string() {
        let uuid_str = "550e8400-e29b-41d4-a716-446655440000";
        let id: PlanId = uuid_str.parse().unwrap();
        assert_eq!(id.to_string(), uuid_str);
    }

    #[test]
    fn period_id_rejects_garbage() {
        assert!("not-a-uuid".parse::<PeriodId>().is_err());
    }

    #[test]
    fn payment_id_from_uuid_preserves_value() {
        let uuid = Uuid::new_v4();
        let id = PaymentId::from_uuid(uuid);
        assert_eq!(id.as_uuid(), &uuid);
    }

    #[test]
    fn member_id_serializes_as_bare_uuid() {
        let uuid_str = "550e8400-e29b-41d4-a716-446655440000";
        let id: MemberId = uuid_str.parse().unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", uuid_str));
    }

    #[test]
    fn user_id_accepts_non_empty_string() {
        let id = UserId::new("staff-123").unwrap();
        assert_eq!(id.as_str(), "staff-123");
    }

    #[test]
    fn generated_user_ids_are_uuids() {
        let id = UserId::generate();
        assert!(Uuid::parse_str(id.as_str()).is_ok());
        assert_ne!(id, UserId::generate());
    }

    #[test]
    fn user_id_rejects_blank_string() {
        match UserId::new("   ") {
            Err(ValidationError::EmptyField { field }) => assert_eq!(field, "user_id"),
            other => panic!("expected EmptyField, got {:?}", other),
        }
    }
}
