use std::sync::Arc;

use bincode::deserialize;
use bincode::serialize;
use chrono::DateTime;
use chrono::Utc;
use rocksdb::Transaction;
use rocksdb::TransactionDB;
use serde::Deserialize;
use serde::Serialize;
use tracing::debug;

use crate::error::MetadataError;
use crate::index::check_insert_constraints;
use crate::list_data;
use crate::make_data_value_key;
use crate::metadata::ListResponse;
use crate::users;
use crate::users::UpsertUserRequest;
use crate::Result;

const NAMESPACE: &[u8] = b"teams";

pub trait Provider: Sync + Send {
    /// Creates the team and upserts every member into it. Members that belonged
    /// to another team are moved.
    fn create(&self, req: CreateTeamRequest) -> Result<Team>;
    fn get_by_name(&self, name: &str) -> Result<Team>;
    fn exists(&self, name: &str) -> Result<bool>;
    fn list(&self) -> Result<ListResponse<Team>>;
    /// Removes the team and detaches its members, who stay as team-less users.
    fn delete(&self, name: &str) -> Result<Team>;
}

pub struct ProviderImpl {
    db: Arc<TransactionDB>,
}

impl ProviderImpl {
    pub fn new(db: Arc<TransactionDB>) -> Self {
        ProviderImpl { db }
    }

    fn get_record_(&self, tx: &Transaction<TransactionDB>, name: &str) -> Result<TeamRecord> {
        match tx.get(make_data_value_key(NAMESPACE, name))? {
            None => Err(MetadataError::NotFound(format!("team {name} not found"))),
            Some(value) => Ok(deserialize(&value)?),
        }
    }

    fn with_members_(&self, tx: &Transaction<TransactionDB>, record: TeamRecord) -> Result<Team> {
        let members = users::list_by_team_(tx, &record.name)?
            .into_iter()
            .map(TeamMember::from)
            .collect();

        Ok(Team {
            name: record.name,
            members,
            created_at: record.created_at,
            updated_at: record.updated_at,
        })
    }
}

impl Provider for ProviderImpl {
    fn create(&self, req: CreateTeamRequest) -> Result<Team> {
        let tx = self.db.transaction();

        let key = make_data_value_key(NAMESPACE, &req.name);
        check_insert_constraints(&tx, &[key.clone()], |_| {
            format!("team {} already exists", req.name)
        })?;

        let record = TeamRecord {
            name: req.name.clone(),
            created_at: Utc::now(),
            updated_at: None,
        };
        tx.put(key, serialize(&record)?)?;

        for member in req.members {
            debug!("adding user {} to team {}", member.user_id, req.name);
            users::upsert_(&tx, UpsertUserRequest {
                id: member.user_id,
                name: member.username,
                team_name: Some(req.name.clone()),
                is_active: member.is_active,
            })?;
        }

        let team = self.with_members_(&tx, record)?;
        tx.commit()?;

        Ok(team)
    }

    fn get_by_name(&self, name: &str) -> Result<Team> {
        let tx = self.db.transaction();
        let record = self.get_record_(&tx, name)?;

        self.with_members_(&tx, record)
    }

    fn exists(&self, name: &str) -> Result<bool> {
        let tx = self.db.transaction();
        Ok(tx.get(make_data_value_key(NAMESPACE, name))?.is_some())
    }

    fn list(&self) -> Result<ListResponse<Team>> {
        let tx = self.db.transaction();
        let teams = list_data::<TeamRecord>(&tx, NAMESPACE)?
            .into_iter()
            .map(|record| self.with_members_(&tx, record))
            .collect::<Result<Vec<_>>>()?;

        Ok(ListResponse::new(teams))
    }

    fn delete(&self, name: &str) -> Result<Team> {
        let tx = self.db.transaction();
        let record = self.get_record_(&tx, name)?;
        let team = self.with_members_(&tx, record)?;

        for member in team.members.iter() {
            users::upsert_(&tx, UpsertUserRequest {
                id: member.user_id.clone(),
                name: member.username.clone(),
                team_name: None,
                is_active: member.is_active,
            })?;
        }
        tx.delete(make_data_value_key(NAMESPACE, name))?;
        tx.commit()?;

        Ok(team)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
struct TeamRecord {
    name: String,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TeamMember {
    pub user_id: String,
    pub username: String,
    pub is_active: bool,
}

impl From<users::User> for TeamMember {
    fn from(value: users::User) -> Self {
        TeamMember {
            user_id: value.id,
            username: value.name,
            is_active: value.is_active,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Team {
    pub name: String,
    pub members: Vec<TeamMember>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CreateTeamRequest {
    pub name: String,
    pub members: Vec<TeamMember>,
}
