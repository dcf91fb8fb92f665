//! In-memory storage implementing every storage port.
//!
//! Used by the test suites and for running the service without a database.
//!
//! Transactions take an exclusive lock on the whole store and work on a
//! private copy that replaces the shared state on commit, so a dropped
//! transaction leaves nothing behind. Reads through the reader or
//! repository ports wait while a transaction is open; a handler must not
//! call them while it holds a transaction on the same store.

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::cmp::Reverse;
use std::sync::{Arc, Mutex as StdMutex};
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::domain::checkin::Checkin;
use crate::domain::foundation::{DomainError, ErrorCode, MemberId, PlanId};
use crate::domain::membership::{
    Member, MemberStatus, MembershipPeriod, Payment, Plan, PlanChange,
};
use crate::domain::user::StaffUser;
use crate::ports::{
    CheckinRepository, DashboardStats, MemberFilter, MemberView, MembershipReader,
    MembershipTransaction, Page, PageRequest, PeriodView, PlanChangeView, PlanRepository,
    UnitOfWork, UserRepository,
};

/// Storage operations that can be told to fail, for rollback tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailPoint {
    Begin,
    InsertMember,
    UpdateMember,
    InsertPeriod,
    UpdatePeriod,
    InsertPayment,
    InsertPlanChange,
    Commit,
}

#[derive(Debug, Clone, Default)]
struct StoreState {
    // Vectors keep insertion order, which doubles as creation order.
    plans: Vec<Plan>,
    members: Vec<Member>,
    periods: Vec<MembershipPeriod>,
    payments: Vec<Payment>,
    plan_changes: Vec<PlanChange>,
    checkins: Vec<Checkin>,
    users: Vec<StaffUser>,
}

impl StoreState {
    fn plan(&self, id: &PlanId) -> Option<&Plan> {
        self.plans.iter().find(|p| p.id == *id)
    }

    fn member(&self, id: &MemberId) -> Option<&Member> {
        self.members.iter().find(|m| m.id == *id)
    }

    fn member_view(&self, member: &Member) -> Result<MemberView, DomainError> {
        let plan = self.plan(&member.plan_id).cloned().ok_or_else(|| {
            DomainError::database(format!(
                "member {} references missing plan {}",
                member.id, member.plan_id
            ))
        })?;
        Ok(MemberView {
            member: member.clone(),
            plan,
        })
    }

    fn check_contacts_unique(&self, member: &Member) -> Result<(), DomainError> {
        for other in self.members.iter().filter(|m| m.id != member.id) {
            if let (Some(mine), Some(theirs)) = (&member.email, &other.email) {
                if mine == theirs {
                    return Err(DomainError::duplicate("email", mine.clone()));
                }
            }
            if let (Some(mine), Some(theirs)) = (&member.phone, &other.phone) {
                if mine == theirs {
                    return Err(DomainError::duplicate("phone", mine.clone()));
                }
            }
        }
        Ok(())
    }

    fn check_single_active_period(&self, period: &MembershipPeriod) -> Result<(), DomainError> {
        let clash = period.is_active()
            && self
                .periods
                .iter()
                .any(|p| p.id != period.id && p.member_id == period.member_id && p.is_active());
        if clash {
            return Err(DomainError::database(format!(
                "member {} already has an active period",
                period.member_id
            )));
        }
        Ok(())
    }
}

/// Shared in-memory store. Cloning shares the same underlying data.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    state: Arc<Mutex<StoreState>>,
    fail_points: Arc<StdMutex<Vec<(FailPoint, DomainError)>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    // === Test Helpers ===

    /// Makes the next call at `point` fail with a database error.
    pub fn fail_next(&self, point: FailPoint) {
        self.fail_next_with(
            point,
            DomainError::database(format!("injected failure at {:?}", point)),
        );
    }

    /// Makes the next call at `point` fail with `error`, e.g. the unique
    /// violation a concurrent writer would cause after our pre-checks.
    pub fn fail_next_with(&self, point: FailPoint, error: DomainError) {
        self.fail_points
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((point, error));
    }

    /// Every payment in the store, oldest first.
    pub async fn all_payments(&self) -> Vec<Payment> {
        self.state.lock().await.payments.clone()
    }

    /// Every period in the store, oldest first.
    pub async fn all_periods(&self) -> Vec<MembershipPeriod> {
        self.state.lock().await.periods.clone()
    }

    /// Overwrites a stored member as-is, bypassing all lifecycle rules.
    pub async fn put_member(&self, member: Member) {
        let mut state = self.state.lock().await;
        if let Some(slot) = state.members.iter_mut().find(|m| m.id == member.id) {
            *slot = member;
        } else {
            state.members.push(member);
        }
    }

    fn trip(
        fail_points: &StdMutex<Vec<(FailPoint, DomainError)>>,
        point: FailPoint,
    ) -> Result<(), DomainError> {
        let mut points = fail_points.lock().unwrap_or_else(|e| e.into_inner());
        match points.iter().position(|(p, _)| *p == point) {
            Some(pos) => Err(points.remove(pos).1),
            None => Ok(()),
        }
    }
}

/// A transaction over an `InMemoryStore`.
pub struct InMemoryTransaction {
    guard: OwnedMutexGuard<StoreState>,
    working: StoreState,
    fail_points: Arc<StdMutex<Vec<(FailPoint, DomainError)>>>,
}

impl InMemoryTransaction {
    fn trip(&self, point: FailPoint) -> Result<(), DomainError> {
        InMemoryStore::trip(&self.fail_points, point)
    }
}

#[async_trait]
impl UnitOfWork for InMemoryStore {
    async fn begin(&self) -> Result<Box<dyn MembershipTransaction>, DomainError> {
        Self::trip(&self.fail_points, FailPoint::Begin)?;
        let guard = self.state.clone().lock_owned().await;
        let working = guard.clone();
        Ok(Box::new(InMemoryTransaction {
            guard,
            working,
            fail_points: self.fail_points.clone(),
        }))
    }
}

#[async_trait]
impl MembershipTransaction for InMemoryTransaction {
    async fn find_plan(&mut self, id: &PlanId) -> Result<Option<Plan>, DomainError> {
        Ok(self.working.plan(id).cloned())
    }

    async fn find_member_for_update(
        &mut self,
        id: &MemberId,
    ) -> Result<Option<Member>, DomainError> {
        Ok(self.working.member(id).cloned())
    }

    async fn find_member_by_email(&mut self, email: &str) -> Result<Option<MemberId>, DomainError> {
        Ok(self
            .working
            .members
            .iter()
            .find(|m| m.email.as_deref() == Some(email))
            .map(|m| m.id))
    }

    async fn find_member_by_phone(&mut self, phone: &str) -> Result<Option<MemberId>, DomainError> {
        Ok(self
            .working
            .members
            .iter()
            .find(|m| m.phone.as_deref() == Some(phone))
            .map(|m| m.id))
    }

    async fn insert_member(&mut self, member: &Member) -> Result<(), DomainError> {
        self.trip(FailPoint::InsertMember)?;
        self.working.check_contacts_unique(member)?;
        self.working.members.push(member.clone());
        Ok(())
    }

    async fn update_member(&mut self, member: &Member) -> Result<(), DomainError> {
        self.trip(FailPoint::UpdateMember)?;
        self.working.check_contacts_unique(member)?;
        let slot = self
            .working
            .members
            .iter_mut()
            .find(|m| m.id == member.id)
            .ok_or_else(|| {
                DomainError::new(ErrorCode::MemberNotFound, format!("Member not found: {}", member.id))
            })?;
        *slot = member.clone();
        Ok(())
    }

    async fn find_active_period(
        &mut self,
        member_id: &MemberId,
    ) -> Result<Option<MembershipPeriod>, DomainError> {
        Ok(self
            .working
            .periods
            .iter()
            .find(|p| p.member_id == *member_id && p.is_active())
            .cloned())
    }

    async fn insert_period(&mut self, period: &MembershipPeriod) -> Result<(), DomainError> {
        self.trip(FailPoint::InsertPeriod)?;
        if self.working.member(&period.member_id).is_none() {
            return Err(DomainError::database(format!(
                "period references missing member {}",
                period.member_id
            )));
        }
        self.working.check_single_active_period(period)?;
        self.working.periods.push(period.clone());
        Ok(())
    }

    async fn update_period(&mut self, period: &MembershipPeriod) -> Result<(), DomainError> {
        self.trip(FailPoint::UpdatePeriod)?;
        self.working.check_single_active_period(period)?;
        let slot = self
            .working
            .periods
            .iter_mut()
            .find(|p| p.id == period.id)
            .ok_or_else(|| {
                DomainError::new(ErrorCode::PeriodNotFound, format!("Period not found: {}", period.id))
            })?;
        *slot = period.clone();
        Ok(())
    }

    async fn find_matching_payment(
        &mut self,
        member_id: &MemberId,
        amount: Decimal,
        paid_on: NaiveDate,
    ) -> Result<Option<Payment>, DomainError> {
        Ok(self
            .working
            .payments
            .iter()
            .find(|p| p.member_id == *member_id && p.amount == amount && p.paid_on == paid_on)
            .cloned())
    }

    async fn insert_payment(&mut self, payment: &Payment) -> Result<(), DomainError> {
        self.trip(FailPoint::InsertPayment)?;
        self.working.payments.push(payment.clone());
        Ok(())
    }

    async fn insert_plan_change(&mut self, change: &PlanChange) -> Result<(), DomainError> {
        self.trip(FailPoint::InsertPlanChange)?;
        self.working.plan_changes.push(change.clone());
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), DomainError> {
        self.trip(FailPoint::Commit)?;
        let InMemoryTransaction {
            mut guard, working, ..
        } = *self;
        *guard = working;
        Ok(())
    }
}

#[async_trait]
impl MembershipReader for InMemoryStore {
    async fn get_member(&self, id: &MemberId) -> Result<Option<MemberView>, DomainError> {
        let state = self.state.lock().await;
        state.member(id).map(|m| state.member_view(m)).transpose()
    }

    async fn list_members(
        &self,
        filter: &MemberFilter,
        page: PageRequest,
    ) -> Result<Page<MemberView>, DomainError> {
        let state = self.state.lock().await;
        let mut matching: Vec<(usize, &Member)> = state
            .members
            .iter()
            .enumerate()
            .filter(|(_, m)| filter.matches(m))
            .collect();
        matching.sort_by_key(|(seq, m)| {
            (m.status.listing_rank(), Reverse(m.updated_at), Reverse(*seq))
        });

        let views = matching
            .into_iter()
            .map(|(_, m)| state.member_view(m))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Page::from_ordered(views, page))
    }

    async fn list_payments(
        &self,
        member_id: &MemberId,
        page: Option<PageRequest>,
    ) -> Result<Page<Payment>, DomainError> {
        let state = self.state.lock().await;
        let mut payments: Vec<Payment> = state
            .payments
            .iter()
            .rev()
            .filter(|p| p.member_id == *member_id)
            .cloned()
            .collect();
        payments.sort_by_key(|p| Reverse(p.paid_on));

        Ok(match page {
            Some(request) => Page::from_ordered(payments, request),
            None => Page::unpaged(payments),
        })
    }

    async fn list_periods(&self, member_id: &MemberId) -> Result<Vec<PeriodView>, DomainError> {
        let state = self.state.lock().await;
        state
            .periods
            .iter()
            .rev()
            .filter(|p| p.member_id == *member_id)
            .map(|period| {
                let plan = state.plan(&period.plan_id).cloned().ok_or_else(|| {
                    DomainError::database(format!("period {} references missing plan", period.id))
                })?;
                let mut payments: Vec<Payment> = state
                    .payments
                    .iter()
                    .rev()
                    .filter(|p| p.period_id == period.id)
                    .cloned()
                    .collect();
                payments.sort_by_key(|p| Reverse(p.paid_on));
                Ok(PeriodView {
                    period: period.clone(),
                    plan,
                    payments,
                })
            })
            .collect()
    }

    async fn list_plan_changes(
        &self,
        member_id: &MemberId,
    ) -> Result<Vec<PlanChangeView>, DomainError> {
        let state = self.state.lock().await;
        Ok(state
            .plan_changes
            .iter()
            .rev()
            .filter(|c| c.member_id == *member_id)
            .map(|c| PlanChangeView {
                id: c.id,
                member_id: c.member_id,
                from_plan_id: c.from_plan_id,
                from_plan_name: c
                    .from_plan_id
                    .and_then(|id| state.plan(&id))
                    .map(|p| p.name.clone()),
                to_plan_id: c.to_plan_id,
                to_plan_name: state
                    .plan(&c.to_plan_id)
                    .map(|p| p.name.clone())
                    .unwrap_or_default(),
                changed_at: c.changed_at,
            })
            .collect())
    }

    async fn find_expiry_candidates(&self, today: NaiveDate) -> Result<Vec<MemberId>, DomainError> {
        let state = self.state.lock().await;
        Ok(state
            .members
            .iter()
            .filter(|m| m.end_date <= today && m.status != MemberStatus::Expired)
            .map(|m| m.id)
            .collect())
    }

    async fn find_soon_to_expire_candidates(
        &self,
        today: NaiveDate,
        until: NaiveDate,
    ) -> Result<Vec<MemberId>, DomainError> {
        let state = self.state.lock().await;
        Ok(state
            .members
            .iter()
            .filter(|m| {
                m.status == MemberStatus::Active && m.end_date > today && m.end_date <= until
            })
            .map(|m| m.id)
            .collect())
    }

    async fn dashboard_stats(
        &self,
        today: NaiveDate,
        until: NaiveDate,
    ) -> Result<DashboardStats, DomainError> {
        let state = self.state.lock().await;
        let count = |status: MemberStatus| {
            state.members.iter().filter(|m| m.status == status).count() as u64
        };
        Ok(DashboardStats {
            active: count(MemberStatus::Active),
            expired: count(MemberStatus::Expired),
            soon_to_expire: count(MemberStatus::SoonToExpire),
            total_fees: state.payments.iter().map(|p| p.amount).sum(),
            upcoming_expiries: state
                .members
                .iter()
                .filter(|m| m.end_date >= today && m.end_date <= until)
                .count() as u64,
        })
    }
}

#[async_trait]
impl PlanRepository for InMemoryStore {
    async fn save(&self, plan: &Plan) -> Result<(), DomainError> {
        self.state.lock().await.plans.push(plan.clone());
        Ok(())
    }

    async fn update(&self, plan: &Plan) -> Result<(), DomainError> {
        let mut state = self.state.lock().await;
        let slot = state
            .plans
            .iter_mut()
            .find(|p| p.id == plan.id)
            .ok_or_else(|| {
                DomainError::new(ErrorCode::PlanNotFound, format!("Plan not found: {}", plan.id))
            })?;
        *slot = plan.clone();
        Ok(())
    }

    async fn delete(&self, id: &PlanId) -> Result<(), DomainError> {
        let mut state = self.state.lock().await;
        let referenced = state.members.iter().any(|m| m.plan_id == *id)
            || state.periods.iter().any(|p| p.plan_id == *id);
        if referenced {
            return Err(DomainError::new(
                ErrorCode::PlanInUse,
                format!("plan {} is still referenced", id),
            ));
        }
        state.plans.retain(|p| p.id != *id);
        Ok(())
    }

    async fn find_by_id(&self, id: &PlanId) -> Result<Option<Plan>, DomainError> {
        Ok(self.state.lock().await.plan(id).cloned())
    }

    async fn list(&self, include_inactive: bool) -> Result<Vec<Plan>, DomainError> {
        let state = self.state.lock().await;
        Ok(state
            .plans
            .iter()
            .rev()
            .filter(|p| include_inactive || p.is_active)
            .cloned()
            .collect())
    }

    async fn count_members_on_plan(&self, id: &PlanId) -> Result<i64, DomainError> {
        let state = self.state.lock().await;
        Ok(state.members.iter().filter(|m| m.plan_id == *id).count() as i64)
    }

    async fn count_periods_on_plan(&self, id: &PlanId) -> Result<i64, DomainError> {
        let state = self.state.lock().await;
        Ok(state.periods.iter().filter(|p| p.plan_id == *id).count() as i64)
    }
}

#[async_trait]
impl CheckinRepository for InMemoryStore {
    async fn save(&self, checkin: &Checkin) -> Result<(), DomainError> {
        let mut state = self.state.lock().await;
        if checkin.is_open()
            && state
                .checkins
                .iter()
                .any(|c| c.member_id == checkin.member_id && c.is_open())
        {
            return Err(DomainError::duplicate("member_id", checkin.member_id.to_string()));
        }
        state.checkins.push(checkin.clone());
        Ok(())
    }

    async fn update(&self, checkin: &Checkin) -> Result<(), DomainError> {
        let mut state = self.state.lock().await;
        if let Some(slot) = state.checkins.iter_mut().find(|c| c.id == checkin.id) {
            *slot = checkin.clone();
        }
        Ok(())
    }

    async fn find_open(&self, member_id: &MemberId) -> Result<Option<Checkin>, DomainError> {
        let state = self.state.lock().await;
        Ok(state
            .checkins
            .iter()
            .find(|c| c.member_id == *member_id && c.is_open())
            .cloned())
    }

    async fn list_for_member(&self, member_id: &MemberId) -> Result<Vec<Checkin>, DomainError> {
        let state = self.state.lock().await;
        Ok(state
            .checkins
            .iter()
            .rev()
            .filter(|c| c.member_id == *member_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn save(&self, user: &StaffUser) -> Result<(), DomainError> {
        let mut state = self.state.lock().await;
        if state.users.iter().any(|u| u.email == user.email) {
            return Err(DomainError::duplicate("email", user.email.clone()));
        }
        state.users.push(user.clone());
        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<StaffUser>, DomainError> {
        let state = self.state.lock().await;
        Ok(state.users.iter().find(|u| u.email == email).cloned())
    }

    async fn list(&self, page: PageRequest) -> Result<Page<StaffUser>, DomainError> {
        let state = self.state.lock().await;
        let newest_first = state.users.iter().rev().cloned().collect();
        Ok(Page::from_ordered(newest_first, page))
    }
}
