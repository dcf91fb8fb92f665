//! Staff account persistence port.

use async_trait::async_trait;

use crate::domain::foundation::DomainError;
use crate::domain::user::StaffUser;

use super::{Page, PageRequest};

/// Repository port for staff accounts.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// # Errors
    ///
    /// - `DuplicateEntry` (field `email`) if the email is taken
    async fn save(&self, user: &StaffUser) -> Result<(), DomainError>;

    /// Looks up an account by its normalized email.
    async fn find_by_email(&self, email: &str) -> Result<Option<StaffUser>, DomainError>;

    /// Accounts newest first.
    async fn list(&self, page: PageRequest) -> Result<Page<StaffUser>, DomainError>;
}
