use std::sync::Arc;

use chrono::DateTime;
use chrono::Utc;
use common::http::CODE_PR_EXISTS;
use common::rbac::Permission;
use metadata::error::MetadataError;
use metadata::pull_requests::Provider as MDPullRequests;
use metadata::users::Provider as MDUsers;
use serde::Deserialize;
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::debug;
use tracing::info;

use crate::error::AssignmentError;
use crate::error::ValidationError;
use crate::reviewers::replace_reviewer;
use crate::reviewers::select_initial_reviewers;
use crate::reviewers::select_replacement_reviewer;
use crate::Context;
use crate::PlatformError;
use crate::Result;

pub struct PullRequests {
    prov: Arc<dyn MDPullRequests>,
    users: Arc<dyn MDUsers>,
    guard: Arc<RwLock<()>>,
}

impl PullRequests {
    pub fn new(
        prov: Arc<dyn MDPullRequests>,
        users: Arc<dyn MDUsers>,
        guard: Arc<RwLock<()>>,
    ) -> Self {
        Self { prov, users, guard }
    }

    /// Creates an open pull request with up to two reviewers drawn from the
    /// active members of the author's team.
    pub async fn create(&self, ctx: Context, req: CreatePullRequestRequest) -> Result<PullRequest> {
        ctx.check_permission(Permission::ManagePullRequests)?;
        req.validate()?;

        let _lock = self.guard.write().await;
        let author = match self.users.get_by_id(&req.author_id) {
            Ok(user) => user,
            Err(MetadataError::NotFound(_)) => {
                return Err(AssignmentError::AuthorNotFound(req.author_id).into());
            }
            Err(err) => return Err(err.into()),
        };
        let team = author.team().ok_or_else(|| {
            AssignmentError::NoTeam(format!("author {} is not in a team", author.id))
        })?;
        let members = self.users.active_team_members(team)?;
        let reviewers = select_initial_reviewers(&author.id, &members, &mut rand::thread_rng());
        debug!(
            "pull request {}: {} candidates, selected {:?}",
            req.pull_request_id,
            members.len(),
            reviewers
        );

        let pr = self
            .prov
            .create(metadata::pull_requests::CreatePullRequestRequest {
                id: req.pull_request_id,
                name: req.pull_request_name,
                author_id: author.id,
                assigned_reviewers: reviewers,
            })
            .map_err(PlatformError::already_exists_as(CODE_PR_EXISTS))?;
        info!("pull request {} created", pr.id);

        Ok(pr.into())
    }

    pub async fn get_by_id(&self, ctx: Context, id: &str) -> Result<PullRequest> {
        ctx.check_permission(Permission::ViewPullRequests)?;

        Ok(self.prov.get_by_id(id)?.into())
    }

    /// OPEN -> MERGED. A second merge is rejected and changes nothing.
    pub async fn merge(&self, ctx: Context, req: MergePullRequestRequest) -> Result<PullRequest> {
        ctx.check_permission(Permission::ManagePullRequests)?;
        req.validate()?;

        let _lock = self.guard.write().await;
        let pr = self.prov.merge(&req.pull_request_id)?;
        info!("pull request {} merged", pr.id);

        Ok(pr.into())
    }

    /// Replaces `old_reviewer_id` with an active member of that reviewer's
    /// team, keeping the position of every other reviewer.
    pub async fn reassign(&self, ctx: Context, req: ReassignRequest) -> Result<ReassignResponse> {
        ctx.check_permission(Permission::ManagePullRequests)?;
        req.validate()?;

        let _lock = self.guard.write().await;
        let pr = self.prov.get_by_id(&req.pull_request_id)?;
        if pr.status == metadata::pull_requests::Status::Merged {
            return Err(AssignmentError::InvalidState(format!(
                "cannot reassign on merged pull request {}",
                pr.id
            ))
            .into());
        }
        if !pr.assigned_reviewers.contains(&req.old_reviewer_id) {
            return Err(AssignmentError::NotAssigned(format!(
                "{} is not a reviewer of {}",
                req.old_reviewer_id, pr.id
            ))
            .into());
        }

        let outgoing = self.users.get_by_id(&req.old_reviewer_id)?;
        let team = outgoing.team().ok_or_else(|| {
            AssignmentError::NoTeam(format!("reviewer {} is not in a team", outgoing.id))
        })?;
        let members = self.users.active_team_members(team)?;
        let new_reviewer = select_replacement_reviewer(
            &pr.author_id,
            &outgoing.id,
            &pr.assigned_reviewers,
            &members,
            &mut rand::thread_rng(),
        )?;

        let reviewers = replace_reviewer(&pr.assigned_reviewers, &outgoing.id, &new_reviewer);
        let pr = self.prov.set_reviewers(&pr.id, reviewers)?;
        info!(
            "pull request {}: reviewer {} replaced by {}",
            pr.id, outgoing.id, new_reviewer
        );

        Ok(ReassignResponse {
            pr: pr.into(),
            replaced_by: new_reviewer,
        })
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Status {
    #[serde(rename = "OPEN")]
    Open,
    #[serde(rename = "MERGED")]
    Merged,
}

impl From<metadata::pull_requests::Status> for Status {
    fn from(value: metadata::pull_requests::Status) -> Self {
        match value {
            metadata::pull_requests::Status::Open => Status::Open,
            metadata::pull_requests::Status::Merged => Status::Merged,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct PullRequest {
    pub pull_request_id: String,
    pub pull_request_name: String,
    pub author_id: String,
    pub status: Status,
    pub assigned_reviewers: Vec<String>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "mergedAt", skip_serializing_if = "Option::is_none", default)]
    pub merged_at: Option<DateTime<Utc>>,
}

impl From<metadata::pull_requests::PullRequest> for PullRequest {
    fn from(value: metadata::pull_requests::PullRequest) -> Self {
        PullRequest {
            pull_request_id: value.id,
            pull_request_name: value.name,
            author_id: value.author_id,
            status: value.status.into(),
            assigned_reviewers: value.assigned_reviewers,
            created_at: value.created_at,
            merged_at: value.merged_at,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct PullRequestShort {
    pub pull_request_id: String,
    pub pull_request_name: String,
    pub author_id: String,
    pub status: Status,
}

impl From<metadata::pull_requests::PullRequestShort> for PullRequestShort {
    fn from(value: metadata::pull_requests::PullRequestShort) -> Self {
        PullRequestShort {
            pull_request_id: value.id,
            pull_request_name: value.name,
            author_id: value.author_id,
            status: value.status.into(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct CreatePullRequestRequest {
    pub pull_request_id: String,
    pub pull_request_name: String,
    pub author_id: String,
}

impl CreatePullRequestRequest {
    fn validate(&self) -> Result<()> {
        let mut err = ValidationError::new();
        if self.pull_request_id.trim().is_empty() {
            err.push_empty("pull_request_id");
        }
        if self.pull_request_name.trim().is_empty() {
            err.push_empty("pull_request_name");
        }
        if self.author_id.trim().is_empty() {
            err.push_empty("author_id");
        }

        err.result()
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct MergePullRequestRequest {
    pub pull_request_id: String,
}

impl MergePullRequestRequest {
    fn validate(&self) -> Result<()> {
        let mut err = ValidationError::new();
        if self.pull_request_id.trim().is_empty() {
            err.push_empty("pull_request_id");
        }

        err.result()
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ReassignRequest {
    pub pull_request_id: String,
    pub old_reviewer_id: String,
}

impl ReassignRequest {
    fn validate(&self) -> Result<()> {
        let mut err = ValidationError::new();
        if self.pull_request_id.trim().is_empty() {
            err.push_empty("pull_request_id");
        }
        if self.old_reviewer_id.trim().is_empty() {
            err.push_empty("old_reviewer_id");
        }

        err.result()
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ReassignResponse {
    pub pr: PullRequest,
    pub replaced_by: String,
}
