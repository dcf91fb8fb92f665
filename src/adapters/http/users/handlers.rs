//! HTTP handlers for staff account and login endpoints.

use axum::extract::{Json, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::adapters::http::error::ApiError;
use crate::adapters::http::middleware::{require_role, RequireAuth};
use crate::adapters::http::state::AppState;
use crate::application::handlers::{CreateUserCommand, ListUsersQuery, LoginCommand};
use crate::domain::foundation::Role;

use super::dto::{
    CreateUserRequest, ListUsersParams, LoginRequest, UserListResponse, UserResponse,
};

/// POST /api/auth/login
///
/// Public; the caller has no token yet.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let token = state
        .login_handler()
        .handle(LoginCommand {
            email: request.email,
            password: request.password,
        })
        .await?;

    Ok(Json(token))
}

/// GET /api/users
pub async fn list_users(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(params): Query<ListUsersParams>,
) -> Result<impl IntoResponse, ApiError> {
    require_role(&user, Role::ADMIN)?;

    let page = state
        .list_users_handler()
        .handle(ListUsersQuery {
            page: params.page,
            limit: params.limit,
        })
        .await?;

    Ok(Json(UserListResponse::from(page)))
}

/// POST /api/users
pub async fn create_user(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(request): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    require_role(&user, Role::ADMIN)?;

    let created = state
        .create_user_handler()
        .handle(CreateUserCommand {
            email: request.email,
            password: request.password,
            role: request.role,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(created))))
}
