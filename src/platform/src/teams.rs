use std::collections::HashSet;
use std::sync::Arc;

use chrono::DateTime;
use chrono::Utc;
use common::http::CODE_TEAM_EXISTS;
use common::rbac::Permission;
use metadata::teams::Provider as MDTeams;
use serde::Deserialize;
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::info;

use crate::error::ValidationError;
use crate::Context;
use crate::PlatformError;
use crate::Result;

pub struct Teams {
    prov: Arc<dyn MDTeams>,
    guard: Arc<RwLock<()>>,
}

impl Teams {
    pub fn new(prov: Arc<dyn MDTeams>, guard: Arc<RwLock<()>>) -> Self {
        Self { prov, guard }
    }

    pub async fn create(&self, ctx: Context, req: CreateTeamRequest) -> Result<Team> {
        ctx.check_permission(Permission::ManageTeams)?;
        req.validate()?;

        // membership and activity of the users change, so no assignment may
        // read the team concurrently
        let _lock = self.guard.write().await;
        let team = self
            .prov
            .create(metadata::teams::CreateTeamRequest {
                name: req.team_name,
                members: req.members.into_iter().map(|v| v.into()).collect(),
            })
            .map_err(PlatformError::already_exists_as(CODE_TEAM_EXISTS))?;
        info!(
            "team {} created with {} members",
            team.name,
            team.members.len()
        );

        Ok(team.into())
    }

    pub async fn get(&self, ctx: Context, team_name: &str) -> Result<Team> {
        ctx.check_permission(Permission::ViewTeams)?;

        Ok(self.prov.get_by_name(team_name)?.into())
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct TeamMember {
    pub user_id: String,
    pub username: String,
    pub is_active: bool,
}

impl From<metadata::teams::TeamMember> for TeamMember {
    fn from(value: metadata::teams::TeamMember) -> Self {
        TeamMember {
            user_id: value.user_id,
            username: value.username,
            is_active: value.is_active,
        }
    }
}

impl From<TeamMember> for metadata::teams::TeamMember {
    fn from(value: TeamMember) -> Self {
        metadata::teams::TeamMember {
            user_id: value.user_id,
            username: value.username,
            is_active: value.is_active,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Team {
    pub team_name: String,
    pub members: Vec<TeamMember>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<metadata::teams::Team> for Team {
    fn from(value: metadata::teams::Team) -> Self {
        Team {
            team_name: value.name,
            members: value.members.into_iter().map(|v| v.into()).collect(),
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct CreateTeamRequest {
    pub team_name: String,
    #[serde(default)]
    pub members: Vec<TeamMember>,
}

impl CreateTeamRequest {
    fn validate(&self) -> Result<()> {
        let mut err = ValidationError::new();
        if self.team_name.trim().is_empty() {
            err.push_empty("team_name");
        }

        let mut seen = HashSet::new();
        for (idx, member) in self.members.iter().enumerate() {
            if member.user_id.trim().is_empty() {
                err.push_empty(format!("members[{idx}].user_id"));
            } else if !seen.insert(member.user_id.as_str()) {
                err.push(format!("members[{idx}].user_id"), "duplicate user");
            }
            if member.username.trim().is_empty() {
                err.push_empty(format!("members[{idx}].username"));
            }
        }

        err.result()
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct GetTeamRequest {
    pub team_name: String,
}
