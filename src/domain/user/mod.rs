//! Staff accounts that sign in to the front desk.
//!
//! - `account` - StaffUser entity and credential rules
//! - `errors` - UserError taxonomy

mod account;
mod errors;

pub use account::{check_password_strength, normalize_email, StaffUser, MIN_PASSWORD_LEN};
pub use errors::UserError;
