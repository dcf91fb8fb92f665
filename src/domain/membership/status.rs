//! Member and period status rules.
//!
//! Member status is a pure function of the current end date and today's
//! date, evaluated at day granularity.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// Days before the end date during which a member counts as soon-to-expire.
pub const SOON_TO_EXPIRE_WINDOW_DAYS: i64 = 7;

/// Whole days from `today` until `end_date`; negative once the end date has passed.
pub fn days_left(end_date: NaiveDate, today: NaiveDate) -> i64 {
    (end_date - today).num_days()
}

/// Length of a period in whole days, never negative.
pub fn balance_days(start_date: NaiveDate, end_date: NaiveDate) -> i32 {
    (end_date - start_date).num_days().max(0) as i32
}

/// Membership status of a member as shown at the front desk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberStatus {
    Active,
    SoonToExpire,
    Expired,
}

impl MemberStatus {
    /// Computes the status for a membership ending on `end_date`.
    ///
    /// Expired once the end date is in the past; soon-to-expire from
    /// seven days out through the end date itself; active otherwise.
    pub fn from_end_date(end_date: NaiveDate, today: NaiveDate) -> Self {
        let left = days_left(end_date, today);
        if left < 0 {
            MemberStatus::Expired
        } else if left <= SOON_TO_EXPIRE_WINDOW_DAYS {
            MemberStatus::SoonToExpire
        } else {
            MemberStatus::Active
        }
    }

    /// Sort rank used by member listings: expired first, active last.
    pub fn listing_rank(&self) -> u8 {
        match self {
            MemberStatus::Expired => 0,
            MemberStatus::SoonToExpire => 1,
            MemberStatus::Active => 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MemberStatus::Active => "active",
            MemberStatus::SoonToExpire => "soon_to_expire",
            MemberStatus::Expired => "expired",
        }
    }
}

impl fmt::Display for MemberStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MemberStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(MemberStatus::Active),
            "soon_to_expire" => Ok(MemberStatus::SoonToExpire),
            "expired" => Ok(MemberStatus::Expired),
            other => Err(ValidationError::invalid_format(
                "status",
                format!("unknown member status '{}'", other),
            )),
        }
    }
}

/// Lifecycle of a membership period.
///
/// `Active` is the only non-terminal state; a member holds at most one
/// active period at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodStatus {
    Active,
    Completed,
    Cancelled,
}

impl PeriodStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PeriodStatus::Active => "active",
            PeriodStatus::Completed => "completed",
            PeriodStatus::Cancelled => "cancelled",
        }
    }

}

impl FromStr for PeriodStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(PeriodStatus::Active),
            "completed" => Ok(PeriodStatus::Completed),
            "cancelled" => Ok(PeriodStatus::Cancelled),
            other => Err(ValidationError::invalid_format(
                "period_status",
                format!("unknown period status '{}'", other),
            )),
        }
    }
}

/// How a period came to exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodKind {
    Initial,
    Renewal,
    PlanSwitch,
}

impl PeriodKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PeriodKind::Initial => "initial",
            PeriodKind::Renewal => "renewal",
            PeriodKind::PlanSwitch => "plan_switch",
        }
    }
}

impl FromStr for PeriodKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "initial" => Ok(PeriodKind::Initial),
            "renewal" => Ok(PeriodKind::Renewal),
            "plan_switch" => Ok(PeriodKind::PlanSwitch),
            other => Err(ValidationError::invalid_format(
                "period_type",
                format!("unknown period type '{}'", other),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use proptest::prelude::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    #[test]
    fn yesterday_is_expired() {
        let end = today() - Duration::days(1);
        assert_eq!(MemberStatus::from_end_date(end, today()), MemberStatus::Expired);
    }

    #[test]
    fn ending_today_is_soon_to_expire() {
        assert_eq!(
            MemberStatus::from_end_date(today(), today()),
            MemberStatus::SoonToExpire
        );
    }

    #[test]
    fn seven_days_out_is_soon_to_expire() {
        let end = today() + Duration::days(7);
        assert_eq!(MemberStatus::from_end_date(end, today()), MemberStatus::SoonToExpire);
    }

    #[test]
    fn eight_days_out_is_active() {
        let end = today() + Duration::days(8);
        assert_eq!(MemberStatus::from_end_date(end, today()), MemberStatus::Active);
    }

    #[test]
    fn balance_days_counts_whole_days_and_floors_at_zero() {
        let start = today();
        assert_eq!(balance_days(start, start + Duration::days(30)), 30);
        assert_eq!(balance_days(start, start - Duration::days(3)), 0);
    }

    #[test]
    fn listing_rank_puts_expired_first() {
        let mut statuses = vec![
            MemberStatus::Active,
            MemberStatus::Expired,
            MemberStatus::SoonToExpire,
        ];
        statuses.sort_by_key(MemberStatus::listing_rank);
        assert_eq!(
            statuses,
            vec![MemberStatus::Expired, MemberStatus::SoonToExpire, MemberStatus::Active]
        );
    }

    #[test]
    fn status_round_trips_through_wire_name() {
        for status in [MemberStatus::Active, MemberStatus::SoonToExpire, MemberStatus::Expired] {
            assert_eq!(status.as_str().parse::<MemberStatus>().unwrap(), status);
        }
        assert!("frozen".parse::<MemberStatus>().is_err());
    }

    #[test]
    fn period_kind_parses_plan_switch() {
        assert_eq!("plan_switch".parse::<PeriodKind>().unwrap(), PeriodKind::PlanSwitch);
    }

    proptest! {
        #[test]
        fn status_is_pure_and_matches_day_count(offset in -400i64..400) {
            let end = today() + Duration::days(offset);
            let first = MemberStatus::from_end_date(end, today());
            let second = MemberStatus::from_end_date(end, today());
            prop_assert_eq!(first, second);

            let expected = if offset < 0 {
                MemberStatus::Expired
            } else if offset <= 7 {
                MemberStatus::SoonToExpire
            } else {
                MemberStatus::Active
            };
            prop_assert_eq!(first, expected);
        }
    }
}
