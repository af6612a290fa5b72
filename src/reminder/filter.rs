use chrono::{DateTime, Utc};

use crate::models::MergeRequest;

/// Marker that keeps a merge request out of reminders. Matched case-sensitively
/// anywhere in the title.
pub const WIP_MARKER: &str = "WIP";

/// A merge request is stale when it is strictly older than `threshold_hours`,
/// is not marked work in progress and nobody has commented on it yet.
pub fn is_stale(mr: &MergeRequest, threshold_hours: f64, now: DateTime<Utc>) -> bool {
    mr.age_hours(now) > threshold_hours
        && !mr.title.contains(WIP_MARKER)
        && mr.user_notes_count == 0
}
