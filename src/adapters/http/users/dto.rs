//! HTTP DTOs for staff account and login endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::Role;
use crate::domain::user::StaffUser;
use crate::ports::Page;

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Body of `POST /api/users`.
#[derive(Clone, Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub password: String,
    #[serde(default = "default_role")]
    pub role: Role,
}

fn default_role() -> Role {
    Role::GymManager
}

/// Body of `POST /api/auth/login`.
#[derive(Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Query string of `GET /api/users`.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ListUsersParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<StaffUser> for UserResponse {
    fn from(user: StaffUser) -> Self {
        Self {
            id: user.id.to_string(),
            email: user.email,
            role: user.role,
            created_at: *user.created_at.as_datetime(),
            updated_at: *user.updated_at.as_datetime(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserListResponse {
    pub data: Vec<UserResponse>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
}

impl From<Page<StaffUser>> for UserListResponse {
    fn from(page: Page<StaffUser>) -> Self {
        Self {
            data: page.data.into_iter().map(UserResponse::from).collect(),
            total: page.total,
            page: page.page,
            limit: page.limit,
        }
    }
}
