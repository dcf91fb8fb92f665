//! Shared state for the HTTP layer.

use std::sync::Arc;

use crate::application::handlers::{
    CheckInHandler, CheckOutHandler, CheckinHistoryHandler, CreateMemberHandler,
    CreatePlanHandler, CreateUserHandler, GetDashboardStatsHandler, GetMemberHandler,
    GetMembershipPeriodsHandler, GetPlanHandler, GetPlanHistoryHandler, ListMembersHandler,
    ListPaymentsHandler, ListPlansHandler, ListUsersHandler, LoginHandler, RecordPaymentHandler,
    RemovePlanHandler, RunStatusSweepHandler, UpdateMemberHandler, UpdatePlanHandler,
};
use crate::ports::{
    CheckinRepository, Clock, MembershipReader, Notifier, PasswordHasher, PlanRepository,
    SessionValidator, TokenIssuer, UnitOfWork, UserRepository,
};

/// Application state shared by every route.
///
/// Cloned per request; every dependency is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub uow: Arc<dyn UnitOfWork>,
    pub reader: Arc<dyn MembershipReader>,
    pub plans: Arc<dyn PlanRepository>,
    pub checkins: Arc<dyn CheckinRepository>,
    pub notifier: Arc<dyn Notifier>,
    pub clock: Arc<dyn Clock>,
    pub session_validator: Arc<dyn SessionValidator>,
    pub users: Arc<dyn UserRepository>,
    pub password_hasher: Arc<dyn PasswordHasher>,
    pub token_issuer: Arc<dyn TokenIssuer>,
}

impl AppState {
    // Members

    pub fn create_member_handler(&self) -> CreateMemberHandler {
        CreateMemberHandler::new(self.uow.clone(), self.notifier.clone(), self.clock.clone())
    }

    pub fn update_member_handler(&self) -> UpdateMemberHandler {
        UpdateMemberHandler::new(self.uow.clone(), self.notifier.clone(), self.clock.clone())
    }

    pub fn get_member_handler(&self) -> GetMemberHandler {
        GetMemberHandler::new(self.reader.clone())
    }

    pub fn list_members_handler(&self) -> ListMembersHandler {
        ListMembersHandler::new(self.reader.clone())
    }

    pub fn plan_history_handler(&self) -> GetPlanHistoryHandler {
        GetPlanHistoryHandler::new(self.reader.clone())
    }

    pub fn membership_periods_handler(&self) -> GetMembershipPeriodsHandler {
        GetMembershipPeriodsHandler::new(self.reader.clone())
    }

    // Payments

    pub fn record_payment_handler(&self) -> RecordPaymentHandler {
        RecordPaymentHandler::new(self.uow.clone(), self.clock.clone())
    }

    pub fn list_payments_handler(&self) -> ListPaymentsHandler {
        ListPaymentsHandler::new(self.reader.clone())
    }

    // Plans

    pub fn create_plan_handler(&self) -> CreatePlanHandler {
        CreatePlanHandler::new(self.plans.clone(), self.clock.clone())
    }

    pub fn list_plans_handler(&self) -> ListPlansHandler {
        ListPlansHandler::new(self.plans.clone())
    }

    pub fn get_plan_handler(&self) -> GetPlanHandler {
        GetPlanHandler::new(self.plans.clone())
    }

    pub fn update_plan_handler(&self) -> UpdatePlanHandler {
        UpdatePlanHandler::new(self.plans.clone(), self.clock.clone())
    }

    pub fn remove_plan_handler(&self) -> RemovePlanHandler {
        RemovePlanHandler::new(self.plans.clone(), self.clock.clone())
    }

    // Check-ins

    pub fn check_in_handler(&self) -> CheckInHandler {
        CheckInHandler::new(self.reader.clone(), self.checkins.clone(), self.clock.clone())
    }

    pub fn check_out_handler(&self) -> CheckOutHandler {
        CheckOutHandler::new(self.checkins.clone(), self.clock.clone())
    }

    pub fn checkin_history_handler(&self) -> CheckinHistoryHandler {
        CheckinHistoryHandler::new(self.reader.clone(), self.checkins.clone())
    }

    // Staff accounts

    pub fn login_handler(&self) -> LoginHandler {
        LoginHandler::new(
            self.users.clone(),
            self.password_hasher.clone(),
            self.token_issuer.clone(),
        )
    }

    pub fn create_user_handler(&self) -> CreateUserHandler {
        CreateUserHandler::new(
            self.users.clone(),
            self.password_hasher.clone(),
            self.clock.clone(),
        )
    }

    pub fn list_users_handler(&self) -> ListUsersHandler {
        ListUsersHandler::new(self.users.clone())
    }

    // Dashboard and tasks

    pub fn dashboard_stats_handler(&self) -> GetDashboardStatsHandler {
        GetDashboardStatsHandler::new(self.reader.clone(), self.clock.clone())
    }

    pub fn status_sweep_handler(&self) -> RunStatusSweepHandler {
        RunStatusSweepHandler::new(self.uow.clone(), self.reader.clone(), self.clock.clone())
    }
}
