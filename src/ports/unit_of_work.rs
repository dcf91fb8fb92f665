//! Transactional write port for the membership ledger.
//!
//! Every lifecycle write (create, renew, switch, payment, sweep step) runs
//! inside one `MembershipTransaction`. Reads taken through the transaction
//! see its own uncommitted writes; nothing is visible to other callers until
//! `commit`. Dropping a transaction without committing rolls it back.
//!
//! # Example
//!
//! ```ignore
//! let mut tx = uow.begin().await?;
//! let mut member = tx.find_member_for_update(&id).await?.ok_or(...)?;
//! let mut period = tx.find_active_period(&id).await?.ok_or(...)?;
//! period.apply_payment(amount, now);
//! member.sync_billing(&period, now);
//! tx.update_period(&period).await?;
//! tx.update_member(&member).await?;
//! tx.commit().await?;
//! ```

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::domain::foundation::{DomainError, MemberId, PlanId};
use crate::domain::membership::{Member, MembershipPeriod, Payment, Plan, PlanChange};

/// Starts membership transactions.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    /// Begins a new transaction (read committed or stronger).
    async fn begin(&self) -> Result<Box<dyn MembershipTransaction>, DomainError>;
}

/// Operations available inside one atomic unit of work.
///
/// # Errors
///
/// - `DuplicateEntry` (with a `field` detail of `email` or `phone`) when a
///   member write violates contact uniqueness
/// - `DatabaseError` on any other storage failure
#[async_trait]
pub trait MembershipTransaction: Send {
    /// Loads a plan.
    async fn find_plan(&mut self, id: &PlanId) -> Result<Option<Plan>, DomainError>;

    /// Loads a member and locks its row until the transaction ends.
    async fn find_member_for_update(&mut self, id: &MemberId)
        -> Result<Option<Member>, DomainError>;

    /// Returns the id of the member using `email`, if any.
    async fn find_member_by_email(&mut self, email: &str) -> Result<Option<MemberId>, DomainError>;

    /// Returns the id of the member using `phone`, if any.
    async fn find_member_by_phone(&mut self, phone: &str) -> Result<Option<MemberId>, DomainError>;

    async fn insert_member(&mut self, member: &Member) -> Result<(), DomainError>;

    async fn update_member(&mut self, member: &Member) -> Result<(), DomainError>;

    /// Returns the member's single active period, if any.
    async fn find_active_period(
        &mut self,
        member_id: &MemberId,
    ) -> Result<Option<MembershipPeriod>, DomainError>;

    async fn insert_period(&mut self, period: &MembershipPeriod) -> Result<(), DomainError>;

    async fn update_period(&mut self, period: &MembershipPeriod) -> Result<(), DomainError>;

    /// Finds an existing payment by the same member with the same amount and date.
    async fn find_matching_payment(
        &mut self,
        member_id: &MemberId,
        amount: Decimal,
        paid_on: NaiveDate,
    ) -> Result<Option<Payment>, DomainError>;

    async fn insert_payment(&mut self, payment: &Payment) -> Result<(), DomainError>;

    async fn insert_plan_change(&mut self, change: &PlanChange) -> Result<(), DomainError>;

    /// Makes every write in this transaction durable and visible.
    async fn commit(self: Box<Self>) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_of_work_is_object_safe() {
        fn _accepts_dyn(_uow: &dyn UnitOfWork) {}
    }

    #[test]
    fn membership_transaction_is_object_safe() {
        fn _accepts_box(_tx: Box<dyn MembershipTransaction>) {}
    }
}
