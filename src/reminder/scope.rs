use async_trait::async_trait;

use crate::error::Result;
use crate::gitlab::MergeRequestSource;
use crate::models::{Member, MergeRequest, Project};

/// What the aggregator walks: the keys to enumerate, how to fetch the merge
/// requests behind each key, and how a reminder line is labelled.
#[async_trait]
pub trait ScopeProvider: Send + Sync {
    type Scope: Send + Sync;

    async fn scopes(&self, source: &dyn MergeRequestSource) -> Result<Vec<Self::Scope>>;

    async fn merge_requests(
        &self,
        source: &dyn MergeRequestSource,
        scope: &Self::Scope,
    ) -> Result<Vec<MergeRequest>>;

    fn label(&self, scope: &Self::Scope, mr: &MergeRequest) -> String;

    /// Short description used in log lines.
    fn describe(&self, scope: &Self::Scope) -> String;
}

/// Members of a group with at least `min_access_level`, and what they authored.
pub struct MemberScopes {
    pub group: String,
    pub min_access_level: u32,
}

#[async_trait]
impl ScopeProvider for MemberScopes {
    type Scope = Member;

    async fn scopes(&self, source: &dyn MergeRequestSource) -> Result<Vec<Member>> {
        let members = source.list_members(&self.group).await?;
        let total = members.len();

        let members: Vec<_> = members
            .into_iter()
            .filter(|m| m.access_level >= self.min_access_level)
            .collect();

        tracing::info!(
            "{} of {} members of {} have access level >= {}",
            members.len(),
            total,
            self.group,
            self.min_access_level
        );
        Ok(members)
    }

    async fn merge_requests(
        &self,
        source: &dyn MergeRequestSource,
        member: &Member,
    ) -> Result<Vec<MergeRequest>> {
        source.list_merge_requests_by_author(&member.username).await
    }

    fn label(&self, _member: &Member, mr: &MergeRequest) -> String {
        mr.references.full.clone()
    }

    fn describe(&self, member: &Member) -> String {
        format!("member {}", member.username)
    }
}

/// Projects of a group, and their open merge requests.
pub struct ProjectScopes {
    pub group: String,
}

#[async_trait]
impl ScopeProvider for ProjectScopes {
    type Scope = Project;

    async fn scopes(&self, source: &dyn MergeRequestSource) -> Result<Vec<Project>> {
        let projects = source.list_projects(&self.group).await?;
        tracing::info!("Found {} projects in {}", projects.len(), self.group);
        Ok(projects)
    }

    async fn merge_requests(
        &self,
        source: &dyn MergeRequestSource,
        project: &Project,
    ) -> Result<Vec<MergeRequest>> {
        source.list_merge_requests_by_project(project.id).await
    }

    fn label(&self, project: &Project, _mr: &MergeRequest) -> String {
        project.name.clone()
    }

    fn describe(&self, project: &Project) -> String {
        format!("project {} ({})", project.name, project.id)
    }
}
