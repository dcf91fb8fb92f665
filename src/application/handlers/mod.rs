//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod checkins;
pub mod dashboard;
pub mod membership;
pub mod plans;
pub mod users;

#[cfg(test)]
pub(crate) mod test_support;

pub use checkins::{
    CheckInCommand, CheckInHandler, CheckOutCommand, CheckOutHandler, CheckinHistoryHandler,
    CheckinHistoryQuery,
};
pub use dashboard::GetDashboardStatsHandler;
pub use membership::{
    CreateMemberCommand, CreateMemberHandler, CreateMemberResult, GetMemberHandler,
    GetMemberQuery, GetMembershipPeriodsHandler, GetMembershipPeriodsQuery, GetPlanHistoryHandler,
    GetPlanHistoryQuery, ListMembersHandler, ListMembersQuery, ListPaymentsHandler,
    ListPaymentsQuery, MemberChange, PaymentListing, PeriodLedger, PeriodRollover,
    RecordPaymentCommand, RecordPaymentHandler, RecordPaymentResult, RunStatusSweepHandler,
    StatusSweepReport, UpdateMemberCommand, UpdateMemberHandler, UpdateMemberResult,
};
pub use plans::{
    CreatePlanCommand, CreatePlanHandler, GetPlanHandler, GetPlanQuery, ListPlansHandler,
    ListPlansQuery, RemovePlanCommand, RemovePlanHandler, RemovePlanResult, SeedPlansHandler,
    UpdatePlanCommand, UpdatePlanHandler,
};
pub use users::{
    CreateUserCommand, CreateUserHandler, ListUsersHandler, ListUsersQuery, LoginCommand,
    LoginHandler, SeedAdminCommand, SeedAdminHandler,
};
