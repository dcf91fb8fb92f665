//! HTTP DTOs for member and payment endpoints.
//!
//! Requests and responses use camelCase field names. Money is serialized
//! as a decimal string, dates as `YYYY-MM-DD`.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::adapters::http::plans::dto::PlanResponse;
use crate::application::handlers::{MemberChange, PaymentListing, StatusSweepReport};
use crate::domain::membership::{
    Member, MemberStatus, MembershipPeriod, Payment, PaymentMethod, PeriodKind, PeriodStatus,
};
use crate::ports::{MemberView, Page, PeriodView, PlanChangeView};

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Body of `POST /api/members`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMemberRequest {
    pub name: String,
    pub age: i32,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    pub membership_plan_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub fees_paid: Decimal,
    #[serde(default)]
    pub status: Option<MemberStatus>,
    #[serde(default)]
    pub balance_days: Option<i32>,
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
}

/// Body of `PUT /api/members/:id`. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMemberRequest {
    pub name: Option<String>,
    pub age: Option<i32>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub membership_plan_id: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// Accepted for compatibility; payments go through the payments endpoint.
    pub fees_paid: Option<Decimal>,
}

/// Body of `POST /api/payments/:member_id`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordPaymentRequest {
    pub amount: Decimal,
    #[serde(default)]
    pub paid_on: Option<NaiveDate>,
    #[serde(default)]
    pub method: Option<PaymentMethod>,
}

/// Query string of `GET /api/members`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListMembersParams {
    pub status: Option<MemberStatus>,
    pub name: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

/// Optional paging for `GET /api/payments/:member_id`.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// A member with its current plan embedded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberResponse {
    pub id: String,
    pub name: String,
    pub age: i32,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub membership_plan_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub membership_plan: Option<PlanResponse>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub fees_paid: Decimal,
    pub due_amount: Decimal,
    pub status: MemberStatus,
    pub balance_days: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Member> for MemberResponse {
    fn from(member: Member) -> Self {
        Self {
            id: member.id.to_string(),
            name: member.name,
            age: member.age,
            phone: member.phone,
            email: member.email,
            membership_plan_id: member.plan_id.to_string(),
            membership_plan: None,
            start_date: member.start_date,
            end_date: member.end_date,
            fees_paid: member.fees_paid,
            due_amount: member.due_amount,
            status: member.status,
            balance_days: member.balance_days,
            created_at: *member.created_at.as_datetime(),
            updated_at: *member.updated_at.as_datetime(),
        }
    }
}

impl From<MemberView> for MemberResponse {
    fn from(view: MemberView) -> Self {
        let mut response = MemberResponse::from(view.member);
        response.membership_plan = Some(PlanResponse::from(view.plan));
        response
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberListResponse {
    pub data: Vec<MemberResponse>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
}

impl From<Page<MemberView>> for MemberListResponse {
    fn from(page: Page<MemberView>) -> Self {
        Self {
            data: page.data.into_iter().map(MemberResponse::from).collect(),
            total: page.total,
            page: page.page,
            limit: page.limit,
        }
    }
}

/// What an update did, in wire form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberChangeKind {
    Profile,
    Renewal,
    PlanSwitch,
}

impl From<&MemberChange> for MemberChangeKind {
    fn from(change: &MemberChange) -> Self {
        match change {
            MemberChange::ProfileOnly => MemberChangeKind::Profile,
            MemberChange::Renewed(_) => MemberChangeKind::Renewal,
            MemberChange::Switched { .. } => MemberChangeKind::PlanSwitch,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMemberResponse {
    pub member: MemberResponse,
    pub change: MemberChangeKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResponse {
    pub id: String,
    pub member_id: String,
    pub period_id: String,
    pub amount: Decimal,
    pub paid_on: NaiveDate,
    pub method: PaymentMethod,
    pub created_at: DateTime<Utc>,
}

impl From<Payment> for PaymentResponse {
    fn from(payment: Payment) -> Self {
        Self {
            id: payment.id.to_string(),
            member_id: payment.member_id.to_string(),
            period_id: payment.period_id.to_string(),
            amount: payment.amount,
            paid_on: payment.paid_on,
            method: payment.method,
            created_at: *payment.created_at.as_datetime(),
        }
    }
}

/// Result of `POST /api/payments/:member_id`.
///
/// `duplicate` is true when an identical payment already existed and
/// nothing was recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordPaymentResponse {
    pub payment: PaymentResponse,
    pub duplicate: bool,
    pub fees_paid: Decimal,
    pub due_amount: Decimal,
    pub status: MemberStatus,
}

/// Payments, either all of them or one page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PaymentListResponse {
    Paged {
        data: Vec<PaymentResponse>,
        total: u64,
        page: u32,
        limit: u32,
    },
    All(Vec<PaymentResponse>),
}

impl From<PaymentListing> for PaymentListResponse {
    fn from(listing: PaymentListing) -> Self {
        match listing {
            PaymentListing::All(payments) => {
                PaymentListResponse::All(payments.into_iter().map(PaymentResponse::from).collect())
            }
            PaymentListing::Paged(page) => PaymentListResponse::Paged {
                data: page.data.into_iter().map(PaymentResponse::from).collect(),
                total: page.total,
                page: page.page,
                limit: page.limit,
            },
        }
    }
}

/// One membership period with its plan and payments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodResponse {
    pub id: String,
    pub membership_plan_id: String,
    pub membership_plan: PlanResponse,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Plan price captured when the period opened.
    pub plan_price: Decimal,
    pub fees_paid: Decimal,
    pub due_amount: Decimal,
    pub status: PeriodStatus,
    #[serde(rename = "type")]
    pub kind: PeriodKind,
    pub payments: Vec<PaymentResponse>,
    pub created_at: DateTime<Utc>,
}

impl From<PeriodView> for PeriodResponse {
    fn from(view: PeriodView) -> Self {
        let MembershipPeriod {
            id,
            plan_id,
            start_date,
            end_date,
            plan_price,
            fees_paid,
            due_amount,
            status,
            kind,
            created_at,
            ..
        } = view.period;

        Self {
            id: id.to_string(),
            membership_plan_id: plan_id.to_string(),
            membership_plan: PlanResponse::from(view.plan),
            start_date,
            end_date,
            plan_price,
            fees_paid,
            due_amount,
            status,
            kind,
            payments: view.payments.into_iter().map(PaymentResponse::from).collect(),
            created_at: *created_at.as_datetime(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanChangeResponse {
    pub id: String,
    pub from_plan_id: Option<String>,
    pub from_plan_name: Option<String>,
    pub to_plan_id: String,
    pub to_plan_name: String,
    pub changed_at: DateTime<Utc>,
}

impl From<PlanChangeView> for PlanChangeResponse {
    fn from(view: PlanChangeView) -> Self {
        Self {
            id: view.id.to_string(),
            from_plan_id: view.from_plan_id.map(|id| id.to_string()),
            from_plan_name: view.from_plan_name,
            to_plan_id: view.to_plan_id.to_string(),
            to_plan_name: view.to_plan_name,
            changed_at: *view.changed_at.as_datetime(),
        }
    }
}

/// Result of `POST /api/tasks/update-member-status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusSweepResponse {
    pub expired: u32,
    pub soon_to_expire: u32,
    pub periods_completed: u32,
    pub failed: u32,
}

impl From<StatusSweepReport> for StatusSweepResponse {
    fn from(report: StatusSweepReport) -> Self {
        Self {
            expired: report.expired,
            soon_to_expire: report.soon_to_expire,
            periods_completed: report.periods_completed,
            failed: report.failed,
        }
    }
}
