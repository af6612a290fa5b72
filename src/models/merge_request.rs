use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergeRequest {
    #[serde(rename = "iid")]
    pub id: u64,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub author: MergeRequestAuthor,
    #[serde(default)]
    pub references: MergeRequestReferences,
    /// Human comments only; system notes are not counted by GitLab.
    pub user_notes_count: i64,
    pub web_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergeRequestAuthor {
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MergeRequestReferences {
    #[serde(default)]
    pub full: String,
}

impl MergeRequest {
    /// Hours elapsed between creation and `now`.
    pub fn age_hours(&self, now: DateTime<Utc>) -> f64 {
        let age = now - self.created_at;
        match age.num_nanoseconds() {
            Some(nanos) => nanos as f64 / 3_600_000_000_000.0,
            // beyond ~292 years nanoseconds overflow
            None => age.num_milliseconds() as f64 / 3_600_000.0,
        }
    }
}
