//! Authentication adapters.
//!
//! - `jwt` - HS256 bearer tokens signed and verified with a shared secret
//! - `password` - Argon2id password hashing
//! - `mock` - Session validator for tests that doesn't require real tokens

mod jwt;
mod mock;
mod password;

pub use jwt::{JwtSessionValidator, JwtTokenIssuer};
pub use mock::MockSessionValidator;
pub use password::Argon2PasswordHasher;
