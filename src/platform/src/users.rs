use std::sync::Arc;

use chrono::DateTime;
use chrono::Utc;
use common::rbac::Permission;
use metadata::pull_requests::Provider as MDPullRequests;
use metadata::users::Provider as MDUsers;
use serde::Deserialize;
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::info;

use crate::error::ValidationError;
use crate::pull_requests::PullRequestShort;
use crate::Context;
use crate::Result;

pub struct Users {
    prov: Arc<dyn MDUsers>,
    pull_requests: Arc<dyn MDPullRequests>,
    guard: Arc<RwLock<()>>,
}

impl Users {
    pub fn new(
        prov: Arc<dyn MDUsers>,
        pull_requests: Arc<dyn MDPullRequests>,
        guard: Arc<RwLock<()>>,
    ) -> Self {
        Self {
            prov,
            pull_requests,
            guard,
        }
    }

    pub async fn set_is_active(&self, ctx: Context, req: SetIsActiveRequest) -> Result<User> {
        ctx.check_permission(Permission::ManageUsers)?;
        let mut err = ValidationError::new();
        if req.user_id.trim().is_empty() {
            err.push_empty("user_id");
        }
        err.result()?;

        let _lock = self.guard.write().await;
        let user = self.prov.set_is_active(&req.user_id, req.is_active)?;
        info!("user {} is_active set to {}", user.id, user.is_active);

        Ok(user.into())
    }

    /// Pull requests the user currently reviews, newest first.
    pub async fn get_reviews(&self, ctx: Context, user_id: &str) -> Result<UserReviews> {
        ctx.check_permission(Permission::ViewPullRequests)?;

        let _lock = self.guard.read().await;
        let user = self.prov.get_by_id(user_id)?;
        let pull_requests = self
            .pull_requests
            .list_by_reviewer(&user.id)?
            .into_iter()
            .map(|v| v.into())
            .collect();

        Ok(UserReviews {
            user_id: user.id,
            pull_requests,
        })
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct User {
    pub user_id: String,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub team_name: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<metadata::users::User> for User {
    fn from(value: metadata::users::User) -> Self {
        User {
            team_name: value.team().map(str::to_string),
            user_id: value.id,
            username: value.name,
            is_active: value.is_active,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct SetIsActiveRequest {
    pub user_id: String,
    pub is_active: bool,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct GetReviewRequest {
    pub user_id: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct UserReviews {
    pub user_id: String,
    pub pull_requests: Vec<PullRequestShort>,
}
