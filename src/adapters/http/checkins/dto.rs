//! HTTP DTOs for check-in endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::checkin::Checkin;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckinResponse {
    pub id: String,
    pub member_id: String,
    pub checked_in_at: DateTime<Utc>,
    pub checked_out_at: Option<DateTime<Utc>>,
}

impl From<Checkin> for CheckinResponse {
    fn from(checkin: Checkin) -> Self {
        Self {
            id: checkin.id.to_string(),
            member_id: checkin.member_id.to_string(),
            checked_in_at: *checkin.checked_in_at.as_datetime(),
            checked_out_at: checkin.checked_out_at.map(|t| *t.as_datetime()),
        }
    }
}
