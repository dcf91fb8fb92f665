//! Database row types and their conversion into domain values.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use std::str::FromStr;
use uuid::Uuid;

use crate::domain::checkin::Checkin;
use crate::domain::foundation::{
    CheckinId, DomainError, ErrorCode, MemberId, PaymentId, PeriodId, PlanChangeId, PlanId, Role,
    Timestamp, UserId,
};
use crate::domain::membership::{
    Member, MemberStatus, MembershipPeriod, Payment, PaymentMethod, PeriodKind, PeriodStatus, Plan,
};
use crate::domain::user::StaffUser;
use crate::ports::{MemberView, PlanChangeView};

pub(super) const PLAN_COLUMNS: &str =
    "id, name, price, duration_days, features, is_active, created_at, updated_at";

pub(super) const MEMBER_COLUMNS: &str = "id, name, age, phone, email, plan_id, start_date, \
     end_date, fees_paid, due_amount, status, balance_days, created_at, updated_at";

pub(super) const PERIOD_COLUMNS: &str = "id, member_id, plan_id, start_date, end_date, \
     plan_price, fees_paid, due_amount, status, period_type, created_at, updated_at";

pub(super) const PAYMENT_COLUMNS: &str =
    "id, member_id, period_id, amount, paid_on, method, created_at";

pub(super) const CHECKIN_COLUMNS: &str = "id, member_id, checked_in_at, checked_out_at";

pub(super) const USER_COLUMNS: &str =
    "id::text AS id, email, password_hash, role, created_at, updated_at";

/// Maps a column string that failed to parse.
fn corrupt(column: &str, value: &str) -> DomainError {
    DomainError::new(
        ErrorCode::DatabaseError,
        format!("Invalid {} value: {}", column, value),
    )
}

/// Wraps an sqlx failure with what was being attempted.
pub(super) fn db_error(context: &str, err: sqlx::Error) -> DomainError {
    DomainError::new(ErrorCode::DatabaseError, format!("Failed to {}: {}", context, err))
}

/// Like `db_error`, but maps member contact uniqueness violations to
/// `DuplicateEntry` with the offending field.
pub(super) fn member_write_error(context: &str, err: sqlx::Error, member: &Member) -> DomainError {
    if let sqlx::Error::Database(db_err) = &err {
        match db_err.constraint() {
            Some("members_email_key") => {
                return DomainError::duplicate("email", member.email.clone().unwrap_or_default())
            }
            Some("members_phone_key") => {
                return DomainError::duplicate("phone", member.phone.clone().unwrap_or_default())
            }
            _ => {}
        }
    }
    db_error(context, err)
}

/// Converts a row count from SQL into an unsigned counter.
pub(super) fn to_count(n: i64) -> u64 {
    u64::try_from(n).unwrap_or(0)
}

#[derive(Debug, sqlx::FromRow)]
pub(super) struct PlanRow {
    pub id: Uuid,
    pub name: String,
    pub price: Decimal,
    pub duration_days: i32,
    pub features: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<PlanRow> for Plan {
    fn from(row: PlanRow) -> Self {
        Plan {
            id: PlanId::from_uuid(row.id),
            name: row.name,
            price: row.price,
            duration_days: row.duration_days,
            features: row.features,
            is_active: row.is_active,
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(super) struct MemberRow {
    pub id: Uuid,
    pub name: String,
    pub age: i32,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub plan_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub fees_paid: Decimal,
    pub due_amount: Decimal,
    pub status: String,
    pub balance_days: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<MemberRow> for Member {
    type Error = DomainError;

    fn try_from(row: MemberRow) -> Result<Self, Self::Error> {
        let status =
            MemberStatus::from_str(&row.status).map_err(|_| corrupt("status", &row.status))?;

        Ok(Member {
            id: MemberId::from_uuid(row.id),
            name: row.name,
            age: row.age,
            phone: row.phone,
            email: row.email,
            plan_id: PlanId::from_uuid(row.plan_id),
            start_date: row.start_date,
            end_date: row.end_date,
            fees_paid: row.fees_paid,
            due_amount: row.due_amount,
            status,
            balance_days: row.balance_days,
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

/// Member joined with its current plan. Plan columns carry a `plan_` prefix.
#[derive(Debug, sqlx::FromRow)]
pub(super) struct MemberWithPlanRow {
    #[sqlx(flatten)]
    pub member: MemberRow,
    pub plan_name: String,
    pub plan_price: Decimal,
    pub plan_duration_days: i32,
    pub plan_features: Option<String>,
    pub plan_is_active: bool,
    pub plan_created_at: DateTime<Utc>,
    pub plan_updated_at: DateTime<Utc>,
}

impl TryFrom<MemberWithPlanRow> for MemberView {
    type Error = DomainError;

    fn try_from(row: MemberWithPlanRow) -> Result<Self, Self::Error> {
        let plan = Plan {
            id: PlanId::from_uuid(row.member.plan_id),
            name: row.plan_name,
            price: row.plan_price,
            duration_days: row.plan_duration_days,
            features: row.plan_features,
            is_active: row.plan_is_active,
            created_at: Timestamp::from_datetime(row.plan_created_at),
            updated_at: Timestamp::from_datetime(row.plan_updated_at),
        };
        Ok(MemberView {
            member: Member::try_from(row.member)?,
            plan,
        })
    }
}

/// Select list for `MemberWithPlanRow`, with members aliased `m` and plans `p`.
pub(super) const MEMBER_WITH_PLAN_SELECT: &str = r#"
    SELECT m.id, m.name, m.age, m.phone, m.email, m.plan_id, m.start_date, m.end_date,
           m.fees_paid, m.due_amount, m.status, m.balance_days, m.created_at, m.updated_at,
           p.name AS plan_name, p.price AS plan_price, p.duration_days AS plan_duration_days,
           p.features AS plan_features, p.is_active AS plan_is_active,
           p.created_at AS plan_created_at, p.updated_at AS plan_updated_at
    FROM members m
    JOIN plans p ON p.id = m.plan_id
"#;

#[derive(Debug, sqlx::FromRow)]
pub(super) struct PeriodRow {
    pub id: Uuid,
    pub member_id: Uuid,
    pub plan_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub plan_price: Decimal,
    pub fees_paid: Decimal,
    pub due_amount: Decimal,
    pub status: String,
    pub period_type: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<PeriodRow> for MembershipPeriod {
    type Error = DomainError;

    fn try_from(row: PeriodRow) -> Result<Self, Self::Error> {
        let status =
            PeriodStatus::from_str(&row.status).map_err(|_| corrupt("status", &row.status))?;
        let kind = PeriodKind::from_str(&row.period_type)
            .map_err(|_| corrupt("period_type", &row.period_type))?;

        Ok(MembershipPeriod {
            id: PeriodId::from_uuid(row.id),
            member_id: MemberId::from_uuid(row.member_id),
            plan_id: PlanId::from_uuid(row.plan_id),
            start_date: row.start_date,
            end_date: row.end_date,
            plan_price: row.plan_price,
            fees_paid: row.fees_paid,
            due_amount: row.due_amount,
            status,
            kind,
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(super) struct PaymentRow {
    pub id: Uuid,
    pub member_id: Uuid,
    pub period_id: Uuid,
    pub amount: Decimal,
    pub paid_on: NaiveDate,
    pub method: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<PaymentRow> for Payment {
    type Error = DomainError;

    fn try_from(row: PaymentRow) -> Result<Self, Self::Error> {
        let method =
            PaymentMethod::from_str(&row.method).map_err(|_| corrupt("method", &row.method))?;

        Ok(Payment {
            id: PaymentId::from_uuid(row.id),
            member_id: MemberId::from_uuid(row.member_id),
            period_id: PeriodId::from_uuid(row.period_id),
            amount: row.amount,
            paid_on: row.paid_on,
            method,
            created_at: Timestamp::from_datetime(row.created_at),
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(super) struct PlanChangeRow {
    pub id: Uuid,
    pub member_id: Uuid,
    pub from_plan_id: Option<Uuid>,
    pub from_plan_name: Option<String>,
    pub to_plan_id: Uuid,
    pub to_plan_name: String,
    pub changed_at: DateTime<Utc>,
}

impl From<PlanChangeRow> for PlanChangeView {
    fn from(row: PlanChangeRow) -> Self {
        PlanChangeView {
            id: PlanChangeId::from_uuid(row.id),
            member_id: MemberId::from_uuid(row.member_id),
            from_plan_id: row.from_plan_id.map(PlanId::from_uuid),
            from_plan_name: row.from_plan_name,
            to_plan_id: PlanId::from_uuid(row.to_plan_id),
            to_plan_name: row.to_plan_name,
            changed_at: Timestamp::from_datetime(row.changed_at),
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(super) struct CheckinRow {
    pub id: Uuid,
    pub member_id: Uuid,
    pub checked_in_at: DateTime<Utc>,
    pub checked_out_at: Option<DateTime<Utc>>,
}

impl From<CheckinRow> for Checkin {
    fn from(row: CheckinRow) -> Self {
        Checkin {
            id: CheckinId::from_uuid(row.id),
            member_id: MemberId::from_uuid(row.member_id),
            checked_in_at: Timestamp::from_datetime(row.checked_in_at),
            checked_out_at: row.checked_out_at.map(Timestamp::from_datetime),
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(super) struct UserRow {
    pub id: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for StaffUser {
    type Error = DomainError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role = Role::from_str(&row.role).map_err(|_| corrupt("role", &row.role))?;
        let id = UserId::new(row.id.clone()).map_err(|_| corrupt("id", &row.id))?;
        Ok(StaffUser {
            id,
            email: row.email,
            password_hash: row.password_hash,
            role,
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}
