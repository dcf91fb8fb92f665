//! Check-in persistence port.

use async_trait::async_trait;

use crate::domain::checkin::Checkin;
use crate::domain::foundation::{DomainError, MemberId};

/// Repository port for front-desk check-ins.
#[async_trait]
pub trait CheckinRepository: Send + Sync {
    /// # Errors
    ///
    /// - `DuplicateEntry` if the member already has an open check-in
    async fn save(&self, checkin: &Checkin) -> Result<(), DomainError>;

    async fn update(&self, checkin: &Checkin) -> Result<(), DomainError>;

    /// The member's open check-in, if any.
    async fn find_open(&self, member_id: &MemberId) -> Result<Option<Checkin>, DomainError>;

    /// All check-ins for a member, newest first.
    async fn list_for_member(&self, member_id: &MemberId) -> Result<Vec<Checkin>, DomainError>;
}
