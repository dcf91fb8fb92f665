//! Plan catalog handlers.

mod create_plan;
mod list_plans;
mod remove_plan;
mod seed_plans;
mod update_plan;

// Commands
pub use create_plan::{CreatePlanCommand, CreatePlanHandler};
pub use remove_plan::{RemovePlanCommand, RemovePlanHandler, RemovePlanResult};
pub use seed_plans::SeedPlansHandler;
pub use update_plan::{UpdatePlanCommand, UpdatePlanHandler};

// Queries
pub use list_plans::{GetPlanHandler, GetPlanQuery, ListPlansHandler, ListPlansQuery};
