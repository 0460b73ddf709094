use std::sync::Arc;

use bincode::deserialize;
use bincode::serialize;
use chrono::DateTime;
use chrono::Utc;
use rocksdb::Transaction;
use rocksdb::TransactionDB;
use serde::Deserialize;
use serde::Serialize;

use crate::error::MetadataError;
use crate::index::delete_index;
use crate::index::update_index;
use crate::list_data;
use crate::list_key_suffixes;
use crate::make_data_value_key;
use crate::make_index_key;
use crate::make_index_value_key;
use crate::metadata::ListResponse;
use crate::Result;

pub(crate) const NAMESPACE: &[u8] = b"users";
const IDX_TEAM: &[u8] = b"team";

fn index_keys(team_name: Option<&str>, user_id: &str) -> Vec<Vec<u8>> {
    match team_name {
        Some(team) if !team.is_empty() => {
            vec![make_index_value_key(NAMESPACE, IDX_TEAM, team, user_id)]
        }
        _ => vec![],
    }
}

pub trait Provider: Sync + Send {
    /// Creates the user or overwrites name, team and activity of an existing one.
    fn upsert(&self, req: UpsertUserRequest) -> Result<User>;
    fn get_by_id(&self, user_id: &str) -> Result<User>;
    fn exists(&self, user_id: &str) -> Result<bool>;
    fn list(&self) -> Result<ListResponse<User>>;
    /// Members of the team ordered by name, active or not.
    fn list_by_team(&self, team_name: &str) -> Result<Vec<User>>;
    /// Members of the team with the active flag set, ordered by name.
    fn active_team_members(&self, team_name: &str) -> Result<Vec<UserSummary>>;
    fn set_is_active(&self, user_id: &str, is_active: bool) -> Result<User>;
    fn delete(&self, user_id: &str) -> Result<User>;
}

pub struct ProviderImpl {
    db: Arc<TransactionDB>,
}

impl ProviderImpl {
    pub fn new(db: Arc<TransactionDB>) -> Self {
        ProviderImpl { db }
    }
}

fn decode_(user_id: &str, value: Option<Vec<u8>>) -> Result<User> {
    match value {
        None => Err(MetadataError::NotFound(format!("user {user_id} not found"))),
        Some(value) => Ok(deserialize(&value)?),
    }
}

pub(crate) fn get_by_id_(tx: &Transaction<TransactionDB>, user_id: &str) -> Result<User> {
    decode_(user_id, tx.get(make_data_value_key(NAMESPACE, user_id))?)
}

/// Same as `get_by_id_` but locks the row until the transaction ends.
pub(crate) fn get_for_update_(tx: &Transaction<TransactionDB>, user_id: &str) -> Result<User> {
    decode_(
        user_id,
        tx.get_for_update(make_data_value_key(NAMESPACE, user_id), true)?,
    )
}

pub(crate) fn upsert_(tx: &Transaction<TransactionDB>, req: UpsertUserRequest) -> Result<User> {
    let now = Utc::now();
    let (user, prev_idx_keys) = match get_for_update_(tx, &req.id) {
        Ok(prev) => {
            let prev_idx_keys = index_keys(prev.team_name.as_deref(), &prev.id);
            let user = User {
                id: prev.id,
                name: req.name,
                team_name: req.team_name,
                is_active: req.is_active,
                created_at: prev.created_at,
                updated_at: Some(now),
            };
            (user, prev_idx_keys)
        }
        Err(MetadataError::NotFound(_)) => (req.into_user(now), vec![]),
        Err(other) => return Err(other),
    };

    let idx_keys = index_keys(user.team_name.as_deref(), &user.id);
    update_index(tx, idx_keys.as_ref(), prev_idx_keys.as_ref())?;
    tx.put(
        make_data_value_key(NAMESPACE, &user.id),
        serialize(&user)?,
    )?;

    Ok(user)
}

pub(crate) fn list_by_team_(tx: &Transaction<TransactionDB>, team_name: &str) -> Result<Vec<User>> {
    let prefix = make_index_key(NAMESPACE, IDX_TEAM, team_name);
    let mut users = list_key_suffixes(tx, &prefix)?
        .iter()
        .map(|id| get_by_id_(tx, id))
        .collect::<Result<Vec<_>>>()?;
    users.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));

    Ok(users)
}

impl Provider for ProviderImpl {
    fn upsert(&self, req: UpsertUserRequest) -> Result<User> {
        let tx = self.db.transaction();
        let user = upsert_(&tx, req)?;
        tx.commit()?;

        Ok(user)
    }

    fn get_by_id(&self, user_id: &str) -> Result<User> {
        let tx = self.db.transaction();
        get_by_id_(&tx, user_id)
    }

    fn exists(&self, user_id: &str) -> Result<bool> {
        let tx = self.db.transaction();
        Ok(tx.get(make_data_value_key(NAMESPACE, user_id))?.is_some())
    }

    fn list(&self) -> Result<ListResponse<User>> {
        let tx = self.db.transaction();
        Ok(ListResponse::new(list_data(&tx, NAMESPACE)?))
    }

    fn list_by_team(&self, team_name: &str) -> Result<Vec<User>> {
        let tx = self.db.transaction();
        list_by_team_(&tx, team_name)
    }

    fn active_team_members(&self, team_name: &str) -> Result<Vec<UserSummary>> {
        let tx = self.db.transaction();
        Ok(list_by_team_(&tx, team_name)?
            .into_iter()
            .filter(|u| u.is_active)
            .map(UserSummary::from)
            .collect())
    }

    fn set_is_active(&self, user_id: &str, is_active: bool) -> Result<User> {
        let tx = self.db.transaction();
        let mut user = get_for_update_(&tx, user_id)?;
        user.is_active = is_active;
        user.updated_at = Some(Utc::now());
        tx.put(make_data_value_key(NAMESPACE, user_id), serialize(&user)?)?;
        tx.commit()?;

        Ok(user)
    }

    fn delete(&self, user_id: &str) -> Result<User> {
        let tx = self.db.transaction();
        let user = get_for_update_(&tx, user_id)?;
        tx.delete(make_data_value_key(NAMESPACE, user_id))?;
        delete_index(&tx, index_keys(user.team_name.as_deref(), user_id).as_ref())?;
        tx.commit()?;

        Ok(user)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub name: String,
    pub team_name: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl User {
    /// Team the user belongs to, treating an empty name as no team.
    pub fn team(&self) -> Option<&str> {
        self.team_name.as_deref().filter(|v| !v.is_empty())
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct UserSummary {
    pub id: String,
    pub name: String,
}

impl From<User> for UserSummary {
    fn from(value: User) -> Self {
        UserSummary {
            id: value.id,
            name: value.name,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct UpsertUserRequest {
    pub id: String,
    pub name: String,
    pub team_name: Option<String>,
    pub is_active: bool,
}

impl UpsertUserRequest {
    pub fn into_user(self, created_at: DateTime<Utc>) -> User {
        User {
            id: self.id,
            name: self.name,
            team_name: self.team_name,
            is_active: self.is_active,
            created_at,
            updated_at: None,
        }
    }
}
