use std::collections::HashMap;
use std::sync::Arc;

use common::rbac::Permission;
use metadata::error::MetadataError;
use metadata::MetadataProvider;
use serde::Deserialize;
use serde::Serialize;

use crate::pull_requests::Status;
use crate::Context;
use crate::Result;

pub struct Statistics {
    md: Arc<MetadataProvider>,
}

impl Statistics {
    pub fn new(md: Arc<MetadataProvider>) -> Self {
        Self { md }
    }

    /// Current review load per user, ordered by user id. Users without
    /// assignments are left out.
    pub async fn assignments_by_users(&self, ctx: Context) -> Result<Vec<UserAssignmentStats>> {
        ctx.check_permission(Permission::ViewStatistics)?;

        let mut stats = vec![];
        for (user_id, count) in self.md.pull_requests.assignments_by_user()? {
            let username = match self.md.users.get_by_id(&user_id) {
                Ok(user) => user.name,
                Err(MetadataError::NotFound(_)) => continue,
                Err(err) => return Err(err.into()),
            };
            stats.push(UserAssignmentStats {
                user_id,
                username,
                assignment_count: count,
            });
        }

        Ok(stats)
    }

    pub async fn pr_count_by_status(&self, ctx: Context) -> Result<Vec<PrStatusStats>> {
        ctx.check_permission(Permission::ViewStatistics)?;

        Ok(self
            .md
            .pull_requests
            .count_by_status()?
            .into_iter()
            .map(|(status, count)| PrStatusStats {
                status: status.into(),
                count,
            })
            .collect())
    }

    pub async fn team_statistics(&self, ctx: Context) -> Result<Vec<TeamStats>> {
        ctx.check_permission(Permission::ViewStatistics)?;

        let mut authored: HashMap<String, usize> = HashMap::new();
        for pr in self.md.pull_requests.list()?.data {
            *authored.entry(pr.author_id).or_insert(0) += 1;
        }

        let stats = self
            .md
            .teams
            .list()?
            .data
            .into_iter()
            .map(|team| TeamStats {
                member_count: team.members.len(),
                active_member_count: team.members.iter().filter(|m| m.is_active).count(),
                pr_count: team
                    .members
                    .iter()
                    .map(|m| authored.get(&m.user_id).copied().unwrap_or(0))
                    .sum(),
                team_name: team.name,
            })
            .collect();

        Ok(stats)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct UserAssignmentStats {
    pub user_id: String,
    pub username: String,
    pub assignment_count: usize,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct PrStatusStats {
    pub status: Status,
    pub count: usize,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct TeamStats {
    pub team_name: String,
    pub member_count: usize,
    pub active_member_count: usize,
    pub pr_count: usize,
}
