//! Staff account and login handlers.

mod create_user;
mod list_users;
mod login;
mod seed_admin;

// Commands
pub use create_user::{CreateUserCommand, CreateUserHandler};
pub use login::{LoginCommand, LoginHandler};
pub use seed_admin::{SeedAdminCommand, SeedAdminHandler};

// Queries
pub use list_users::{ListUsersHandler, ListUsersQuery};
