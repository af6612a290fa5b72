use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Member, MergeRequest, Project};

/// Read access to the code-hosting platform. Each call returns a single page.
#[async_trait]
pub trait MergeRequestSource: Send + Sync {
    async fn list_members(&self, group: &str) -> Result<Vec<Member>>;
    async fn list_projects(&self, group: &str) -> Result<Vec<Project>>;
    /// Open merge requests authored by `username`, across every project the token can see.
    async fn list_merge_requests_by_author(&self, username: &str) -> Result<Vec<MergeRequest>>;
    async fn list_merge_requests_by_project(&self, project_id: u64) -> Result<Vec<MergeRequest>>;
}
