//! Shared fixtures for handler tests.

use async_trait::async_trait;
use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use std::sync::{Arc, Mutex};

use crate::adapters::memory::{FixedClock, InMemoryStore};
use crate::domain::foundation::{DomainError, ErrorCode, MemberId, Timestamp};
use crate::domain::membership::Plan;
use crate::domain::user::StaffUser;
use crate::ports::{
    AccessToken, Clock, Notification, Notifier, PasswordHasher, PlanRepository, TokenIssuer,
};

use super::membership::{CreateMemberCommand, CreateMemberHandler};

// ════════════════════════════════════════════════════════════════════════════
// Mock Implementations
// ════════════════════════════════════════════════════════════════════════════

pub struct RecordingNotifier {
    sent: Mutex<Vec<Notification>>,
    fail: bool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, notification: &Notification) -> Result<(), DomainError> {
        self.sent.lock().unwrap().push(notification.clone());
        if self.fail {
            return Err(DomainError::new(ErrorCode::InternalError, "Simulated send failure"));
        }
        Ok(())
    }
}

/// Reversible "hash" so tests can assert on what was stored.
pub struct PlainHasher;

#[async_trait]
impl PasswordHasher for PlainHasher {
    async fn hash(&self, password: &str) -> Result<String, DomainError> {
        Ok(format!("plain:{}", password))
    }

    async fn verify(&self, password: &str, hash: &str) -> bool {
        hash.strip_prefix("plain:") == Some(password)
    }
}

pub struct StaticTokenIssuer;

impl TokenIssuer for StaticTokenIssuer {
    fn issue(&self, user: &StaffUser) -> Result<AccessToken, DomainError> {
        Ok(AccessToken::bearer(format!("token-for-{}", user.id), 3600))
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Fixture
// ════════════════════════════════════════════════════════════════════════════

pub fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
}

pub struct Fixture {
    pub store: InMemoryStore,
    pub clock: Arc<FixedClock>,
    pub notifier: Arc<RecordingNotifier>,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_notifier(RecordingNotifier::new())
    }

    pub fn with_notifier(notifier: RecordingNotifier) -> Self {
        Self {
            store: InMemoryStore::new(),
            clock: Arc::new(FixedClock::on(today())),
            notifier: Arc::new(notifier),
        }
    }

    pub fn clock(&self) -> Arc<dyn Clock> {
        self.clock.clone()
    }

    pub fn notifier(&self) -> Arc<dyn Notifier> {
        self.notifier.clone()
    }

    pub async fn plan(&self, name: &str, price: &str, days: i32) -> Plan {
        let plan = Plan::new(name, dec(price), days, None, Timestamp::now()).unwrap();
        PlanRepository::save(&self.store, &plan).await.unwrap();
        plan
    }

    pub fn create_handler(&self) -> CreateMemberHandler {
        CreateMemberHandler::new(Arc::new(self.store.clone()), self.notifier(), self.clock())
    }

    pub fn create_command(&self, plan: &Plan, email: &str, fees_paid: &str) -> CreateMemberCommand {
        CreateMemberCommand {
            name: "Priya".to_string(),
            age: 27,
            phone: None,
            email: Some(email.to_string()),
            plan_id: plan.id,
            start_date: today(),
            end_date: today() + Duration::days(plan.duration_days as i64),
            fees_paid: dec(fees_paid),
            status: None,
            balance_days: None,
            payment_method: None,
        }
    }

    /// Enrolls a member on `plan` having paid `fees_paid`.
    pub async fn member(&self, plan: &Plan, email: &str, fees_paid: &str) -> MemberId {
        self.create_handler()
            .handle(self.create_command(plan, email, fees_paid))
            .await
            .unwrap()
            .member
            .id
    }

    /// Lets spawned notification tasks run.
    pub async fn settle(&self) {
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
    }
}
