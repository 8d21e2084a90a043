// Pending change module
// A staged, uncommitted edit to one booking

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

/// A staged edit produced by the grid's move/resize gestures.
///
/// At most one pending change exists per booking id; staging a second edit
/// on the same booking overwrites the first. Drained only by apply/cancel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingChange {
    pub booking_id: i64,
    #[serde(with = "crate::models::booking::hhmm")]
    pub time: NaiveTime,
    pub table_number: String,
    pub duration_minutes: i64,
}
