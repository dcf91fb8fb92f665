//! HTTP handlers for member and payment endpoints.

use axum::extract::{Json, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::adapters::http::error::{parse_id, ApiError};
use crate::adapters::http::middleware::{require_role, RequireAuth};
use crate::adapters::http::state::AppState;
use crate::application::handlers::{
    CreateMemberCommand, GetMemberQuery, GetMembershipPeriodsQuery, GetPlanHistoryQuery,
    ListMembersQuery, ListPaymentsQuery, RecordPaymentCommand, UpdateMemberCommand,
};
use crate::domain::foundation::{MemberId, PlanId, Role};

use super::dto::{
    CreateMemberRequest, ListMembersParams, MemberChangeKind, MemberListResponse, MemberResponse,
    PageParams, PaymentListResponse, PaymentResponse, PeriodResponse, PlanChangeResponse,
    RecordPaymentRequest, RecordPaymentResponse, UpdateMemberRequest, UpdateMemberResponse,
};

// ════════════════════════════════════════════════════════════════════════════════
// Members
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/members
///
/// Enrolls a member, opens the first period and records `feesPaid` as
/// the first payment.
pub async fn create_member(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(request): Json<CreateMemberRequest>,
) -> Result<impl IntoResponse, ApiError> {
    require_role(&user, Role::STAFF)?;

    let plan_id: PlanId = parse_id(&request.membership_plan_id, "membershipPlanId")?;
    let result = state
        .create_member_handler()
        .handle(CreateMemberCommand {
            name: request.name,
            age: request.age,
            phone: request.phone,
            email: request.email,
            plan_id,
            start_date: request.start_date,
            end_date: request.end_date,
            fees_paid: request.fees_paid,
            status: request.status,
            balance_days: request.balance_days,
            payment_method: request.payment_method,
        })
        .await?;

    tracing::info!(member_id = %result.member.id, created_by = %user.id, "member enrolled");

    let view = state
        .get_member_handler()
        .handle(GetMemberQuery {
            member_id: result.member.id,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(MemberResponse::from(view))))
}

/// GET /api/members
pub async fn list_members(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(params): Query<ListMembersParams>,
) -> Result<impl IntoResponse, ApiError> {
    require_role(&user, Role::STAFF)?;

    let page = state
        .list_members_handler()
        .handle(ListMembersQuery {
            status: params.status,
            name: params.name,
            page: params.page,
            limit: params.limit,
        })
        .await?;

    Ok(Json(MemberListResponse::from(page)))
}

/// GET /api/members/:id
pub async fn get_member(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    require_role(&user, Role::ALL)?;

    let view = state
        .get_member_handler()
        .handle(GetMemberQuery {
            member_id: parse_id(&id, "id")?,
        })
        .await?;

    Ok(Json(MemberResponse::from(view)))
}

/// PUT /api/members/:id
///
/// Profile edit, renewal or plan switch depending on which fields change.
pub async fn update_member(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<String>,
    Json(request): Json<UpdateMemberRequest>,
) -> Result<impl IntoResponse, ApiError> {
    require_role(&user, Role::STAFF)?;

    let member_id: MemberId = parse_id(&id, "id")?;
    let plan_id = request
        .membership_plan_id
        .as_deref()
        .map(|raw| parse_id::<PlanId>(raw, "membershipPlanId"))
        .transpose()?;

    let result = state
        .update_member_handler()
        .handle(UpdateMemberCommand {
            member_id,
            name: request.name,
            age: request.age,
            phone: request.phone,
            email: request.email,
            plan_id,
            start_date: request.start_date,
            end_date: request.end_date,
            fees_paid: request.fees_paid,
        })
        .await?;

    let change = MemberChangeKind::from(&result.change);
    tracing::info!(
        member_id = %member_id,
        change = ?change,
        updated_by = %user.id,
        "member updated"
    );

    let view = state
        .get_member_handler()
        .handle(GetMemberQuery { member_id })
        .await?;

    Ok(Json(UpdateMemberResponse {
        member: MemberResponse::from(view),
        change,
    }))
}

/// GET /api/members/:id/plan-history
pub async fn get_plan_history(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    require_role(&user, Role::STAFF)?;

    let changes = state
        .plan_history_handler()
        .handle(GetPlanHistoryQuery {
            member_id: parse_id(&id, "id")?,
        })
        .await?;

    Ok(Json(
        changes.into_iter().map(PlanChangeResponse::from).collect::<Vec<_>>(),
    ))
}

/// GET /api/members/:id/membership-periods
pub async fn get_membership_periods(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    require_role(&user, Role::ALL)?;

    let periods = state
        .membership_periods_handler()
        .handle(GetMembershipPeriodsQuery {
            member_id: parse_id(&id, "id")?,
        })
        .await?;

    Ok(Json(periods.into_iter().map(PeriodResponse::from).collect::<Vec<_>>()))
}

// ════════════════════════════════════════════════════════════════════════════════
// Payments
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/payments/:member_id
///
/// 201 for a new payment; 200 when an identical payment already existed.
pub async fn record_payment(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(member_id): Path<String>,
    Json(request): Json<RecordPaymentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    require_role(&user, Role::STAFF)?;

    let result = state
        .record_payment_handler()
        .handle(RecordPaymentCommand {
            member_id: parse_id(&member_id, "memberId")?,
            amount: request.amount,
            paid_on: request.paid_on,
            method: request.method,
        })
        .await?;

    let status = if result.duplicate {
        StatusCode::OK
    } else {
        tracing::info!(
            member_id = %result.member.id,
            payment_id = %result.payment.id,
            amount = %result.payment.amount,
            recorded_by = %user.id,
            "payment recorded"
        );
        StatusCode::CREATED
    };

    Ok((
        status,
        Json(RecordPaymentResponse {
            payment: PaymentResponse::from(result.payment),
            duplicate: result.duplicate,
            fees_paid: result.member.fees_paid,
            due_amount: result.member.due_amount,
            status: result.member.status,
        }),
    ))
}

/// GET /api/payments/:member_id
///
/// Returns every payment unless `page` or `limit` is given.
pub async fn list_payments(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(member_id): Path<String>,
    Query(params): Query<PageParams>,
) -> Result<impl IntoResponse, ApiError> {
    require_role(&user, Role::ALL)?;

    let listing = state
        .list_payments_handler()
        .handle(ListPaymentsQuery {
            member_id: parse_id(&member_id, "memberId")?,
            page: params.page,
            limit: params.limit,
        })
        .await?;

    Ok(Json(PaymentListResponse::from(listing)))
}
