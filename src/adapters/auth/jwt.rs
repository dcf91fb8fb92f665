//! HS256 JWT issuance and validation.
//!
//! Tokens carry the staff identity and role:
//!
//! ```json
//! { "sub": "staff-42", "email": "desk@gym.example.com", "role": "gym_manager", "exp": 1735689600 }
//! ```

use async_trait::async_trait;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

use crate::config::AuthConfig;
use crate::domain::foundation::{
    AuthError, AuthenticatedUser, DomainError, ErrorCode, Role, UserId,
};
use crate::domain::user::StaffUser;
use crate::ports::{AccessToken, SessionValidator, TokenIssuer};

/// Claims written into tokens issued at login.
#[derive(Debug, Serialize)]
struct IssuedClaims<'a> {
    sub: &'a str,
    email: &'a str,
    role: Role,
    iat: i64,
    exp: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    iss: Option<&'a str>,
}

/// Signs HS256 tokens that `JwtSessionValidator` accepts with the same config.
pub struct JwtTokenIssuer {
    key: EncodingKey,
    issuer: Option<String>,
    ttl_secs: u64,
}

impl JwtTokenIssuer {
    pub fn new(secret: &[u8], issuer: Option<String>, ttl_secs: u64) -> Self {
        Self {
            key: EncodingKey::from_secret(secret),
            issuer,
            ttl_secs,
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(
            config.jwt_secret.expose_secret().as_bytes(),
            config.issuer.clone(),
            config.token_ttl_secs,
        )
    }
}

impl TokenIssuer for JwtTokenIssuer {
    fn issue(&self, user: &StaffUser) -> Result<AccessToken, DomainError> {
        let now = chrono::Utc::now().timestamp();
        let ttl = i64::try_from(self.ttl_secs).unwrap_or(i64::MAX);
        let claims = IssuedClaims {
            sub: user.id.as_str(),
            email: &user.email,
            role: user.role,
            iat: now,
            exp: now.saturating_add(ttl),
            iss: self.issuer.as_deref(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.key).map_err(|e| {
            DomainError::new(ErrorCode::InternalError, format!("Failed to sign token: {}", e))
        })?;
        Ok(AccessToken::bearer(token, self.ttl_secs))
    }
}

/// Claims this service reads from a token.
#[derive(Debug, Deserialize)]
struct GymClaims {
    sub: String,
    #[serde(default)]
    email: Option<String>,
    role: String,
}

/// Verifies HS256-signed bearer tokens with a shared secret.
pub struct JwtSessionValidator {
    key: DecodingKey,
    validation: Validation,
}

impl JwtSessionValidator {
    pub fn new(secret: &[u8], issuer: Option<&str>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp", "sub"]);
        if let Some(issuer) = issuer {
            validation.set_issuer(&[issuer]);
        }

        Self {
            key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(
            config.jwt_secret.expose_secret().as_bytes(),
            config.issuer.as_deref(),
        )
    }
}

#[async_trait]
impl SessionValidator for JwtSessionValidator {
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        let data = decode::<GymClaims>(token, &self.key, &self.validation).map_err(|e| {
            use jsonwebtoken::errors::ErrorKind;
            match e.kind() {
                ErrorKind::ExpiredSignature => {
                    tracing::debug!("Token expired");
                    AuthError::TokenExpired
                }
                ErrorKind::InvalidIssuer => {
                    tracing::warn!("Invalid issuer in token");
                    AuthError::InvalidToken
                }
                _ => {
                    tracing::warn!("Token validation failed: {}", e);
                    AuthError::InvalidToken
                }
            }
        })?;

        let claims = data.claims;
        let role: Role = claims.role.parse()?;
        let id = UserId::new(claims.sub).map_err(|_| AuthError::InvalidToken)?;

        Ok(AuthenticatedUser::new(id, claims.email.unwrap_or_default(), role))
    }
}
