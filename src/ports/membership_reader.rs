//! Membership reader port (read side / queries).
//!
//! Read-optimized views for listings, detail screens, the status sweep's
//! candidate selection and the dashboard. Nothing here takes row locks;
//! anything that must be re-checked before writing is re-read through a
//! `MembershipTransaction`.

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::foundation::{DomainError, MemberId, PlanChangeId, PlanId, Timestamp};
use crate::domain::membership::{Member, MemberStatus, MembershipPeriod, Payment, Plan};

/// Default page size for paginated listings.
pub const DEFAULT_PAGE_LIMIT: u32 = 10;

/// Largest page size a caller may request.
pub const MAX_PAGE_LIMIT: u32 = 100;

/// Reader port for membership queries.
#[async_trait]
pub trait MembershipReader: Send + Sync {
    /// Member with its current plan. `None` if the member does not exist.
    async fn get_member(&self, id: &MemberId) -> Result<Option<MemberView>, DomainError>;

    /// Members ordered expired, soon-to-expire, active; most recently
    /// updated first within each group.
    async fn list_members(
        &self,
        filter: &MemberFilter,
        page: PageRequest,
    ) -> Result<Page<MemberView>, DomainError>;

    /// Payments for a member, newest `paid_on` first. All of them when `page` is `None`.
    async fn list_payments(
        &self,
        member_id: &MemberId,
        page: Option<PageRequest>,
    ) -> Result<Page<Payment>, DomainError>;

    /// Periods for a member, newest created first, with plan and payments.
    async fn list_periods(&self, member_id: &MemberId) -> Result<Vec<PeriodView>, DomainError>;

    /// Plan change records for a member, newest first.
    async fn list_plan_changes(
        &self,
        member_id: &MemberId,
    ) -> Result<Vec<PlanChangeView>, DomainError>;

    /// Members with `end_date <= today` whose status is not yet expired.
    async fn find_expiry_candidates(&self, today: NaiveDate) -> Result<Vec<MemberId>, DomainError>;

    /// Active members with `today < end_date <= until`.
    async fn find_soon_to_expire_candidates(
        &self,
        today: NaiveDate,
        until: NaiveDate,
    ) -> Result<Vec<MemberId>, DomainError>;

    /// Aggregate counts for the dashboard.
    async fn dashboard_stats(
        &self,
        today: NaiveDate,
        until: NaiveDate,
    ) -> Result<DashboardStats, DomainError>;
}

/// Member listing filter. Empty filter matches everyone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberFilter {
    pub status: Option<MemberStatus>,
    /// Case-insensitive substring of the member's name.
    pub name: Option<String>,
}

impl MemberFilter {
    /// True if `member` passes every set criterion.
    pub fn matches(&self, member: &Member) -> bool {
        if let Some(status) = self.status {
            if member.status != status {
                return false;
            }
        }
        if let Some(name) = &self.name {
            if !member.name.to_lowercase().contains(&name.to_lowercase()) {
                return false;
            }
        }
        true
    }
}

/// One-based page request, already clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl PageRequest {
    /// Applies defaults (page 1, limit 10) and caps `limit` at 100.
    pub fn new(page: Option<u32>, limit: Option<u32>) -> Self {
        Self {
            page: page.filter(|p| *p > 0).unwrap_or(1),
            limit: limit
                .filter(|l| *l > 0)
                .unwrap_or(DEFAULT_PAGE_LIMIT)
                .min(MAX_PAGE_LIMIT),
        }
    }

    /// Rows to skip.
    pub fn offset(&self) -> u64 {
        (self.page as u64 - 1) * self.limit as u64
    }
}

/// A page of results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
}

impl<T> Page<T> {
    /// Slices an already ordered, complete result set.
    pub fn from_ordered(items: Vec<T>, request: PageRequest) -> Self {
        let total = items.len() as u64;
        let data = items
            .into_iter()
            .skip(request.offset() as usize)
            .take(request.limit as usize)
            .collect();
        Self {
            data,
            total,
            page: request.page,
            limit: request.limit,
        }
    }

    /// Wraps an unpaginated result set as a single page.
    pub fn unpaged(items: Vec<T>) -> Self {
        let total = items.len() as u64;
        Self {
            data: items,
            total,
            page: 1,
            limit: total as u32,
        }
    }
}

/// Member with its current plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberView {
    pub member: Member,
    pub plan: Plan,
}

/// Period with its plan and the payments applied to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodView {
    pub period: MembershipPeriod,
    pub plan: Plan,
    pub payments: Vec<Payment>,
}

/// Plan change with plan names resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanChangeView {
    pub id: PlanChangeId,
    pub member_id: MemberId,
    pub from_plan_id: Option<PlanId>,
    pub from_plan_name: Option<String>,
    pub to_plan_id: PlanId,
    pub to_plan_name: String,
    pub changed_at: Timestamp,
}

/// Dashboard counters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DashboardStats {
    pub active: u64,
    pub expired: u64,
    pub soon_to_expire: u64,
    /// Sum of every recorded payment.
    pub total_fees: Decimal,
    /// Members whose end date falls within the next week, inclusive.
    pub upcoming_expiries: u64,
}
