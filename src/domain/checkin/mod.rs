//! Front-desk check-ins.
//!
//! A member has at most one open check-in (no `checked_out_at`) at a time.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{CheckinId, MemberId, Timestamp};

/// A single gym visit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Checkin {
    pub id: CheckinId,
    pub member_id: MemberId,
    pub checked_in_at: Timestamp,
    pub checked_out_at: Option<Timestamp>,
}

impl Checkin {
    /// Opens a visit at `now`.
    pub fn open(member_id: MemberId, now: Timestamp) -> Self {
        Self {
            id: CheckinId::new(),
            member_id,
            checked_in_at: now,
            checked_out_at: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.checked_out_at.is_none()
    }

    /// Closes the visit. A visit that is already closed keeps its first checkout time.
    pub fn close(&mut self, now: Timestamp) {
        if self.is_open() {
            self.checked_out_at = Some(now);
        }
    }
}
