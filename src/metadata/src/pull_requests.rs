use std::collections::BTreeMap;
use std::fmt::Display;
use std::fmt::Formatter;
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
use crate::index::check_insert_constraints;
use crate::index::delete_index;
use crate::index::insert_index;
use crate::index::update_index;
use crate::list_data;
use crate::list_key_suffixes;
use crate::make_data_value_key;
use crate::make_index_key;
use crate::make_index_value_key;
use crate::metadata::ListResponse;
use crate::Result;

const NAMESPACE: &[u8] = b"pull_requests";
const IDX_REVIEWER: &[u8] = b"reviewer";

fn index_keys(pr: &PullRequest) -> Vec<Vec<u8>> {
    pr.assigned_reviewers
        .iter()
        .map(|reviewer| make_index_value_key(NAMESPACE, IDX_REVIEWER, reviewer, &pr.id))
        .collect()
}

pub trait Provider: Sync + Send {
    fn create(&self, req: CreatePullRequestRequest) -> Result<PullRequest>;
    fn get_by_id(&self, id: &str) -> Result<PullRequest>;
    fn exists(&self, id: &str) -> Result<bool>;
    fn list(&self) -> Result<ListResponse<PullRequest>>;
    /// Pull requests that currently list `user_id` as a reviewer, newest first.
    fn list_by_reviewer(&self, user_id: &str) -> Result<Vec<PullRequestShort>>;
    /// Overwrites the reviewer list of an open pull request.
    fn set_reviewers(&self, id: &str, reviewers: Vec<String>) -> Result<PullRequest>;
    fn update(&self, id: &str, req: UpdatePullRequestRequest) -> Result<PullRequest>;
    /// OPEN -> MERGED. Fails with `AlreadyMerged` and leaves the record
    /// untouched when the pull request is already merged.
    fn merge(&self, id: &str) -> Result<PullRequest>;
    fn delete(&self, id: &str) -> Result<PullRequest>;
    fn count_by_status(&self) -> Result<BTreeMap<Status, usize>>;
    /// Number of pull requests each user is currently assigned to.
    fn assignments_by_user(&self) -> Result<BTreeMap<String, usize>>;
}

pub struct ProviderImpl {
    db: Arc<TransactionDB>,
}

impl ProviderImpl {
    pub fn new(db: Arc<TransactionDB>) -> Self {
        ProviderImpl { db }
    }

    fn decode_(&self, id: &str, value: Option<Vec<u8>>) -> Result<PullRequest> {
        match value {
            None => Err(MetadataError::NotFound(format!(
                "pull request {id} not found"
            ))),
            Some(value) => Ok(deserialize(&value)?),
        }
    }

    fn get_by_id_(&self, tx: &Transaction<TransactionDB>, id: &str) -> Result<PullRequest> {
        self.decode_(id, tx.get(make_data_value_key(NAMESPACE, id))?)
    }

    fn get_for_update_(&self, tx: &Transaction<TransactionDB>, id: &str) -> Result<PullRequest> {
        self.decode_(
            id,
            tx.get_for_update(make_data_value_key(NAMESPACE, id), true)?,
        )
    }

    fn put_(&self, tx: &Transaction<TransactionDB>, pr: &PullRequest) -> Result<()> {
        tx.put(make_data_value_key(NAMESPACE, &pr.id), serialize(pr)?)?;
        Ok(())
    }
}

impl Provider for ProviderImpl {
    fn create(&self, req: CreatePullRequestRequest) -> Result<PullRequest> {
        let tx = self.db.transaction();

        let key = make_data_value_key(NAMESPACE, &req.id);
        check_insert_constraints(&tx, &[key], |_| {
            format!("pull request {} already exists", req.id)
        })?;

        let pr = req.into_pull_request(Utc::now());
        self.put_(&tx, &pr)?;
        insert_index(&tx, index_keys(&pr).as_ref())?;
        tx.commit()?;

        Ok(pr)
    }

    fn get_by_id(&self, id: &str) -> Result<PullRequest> {
        let tx = self.db.transaction();
        self.get_by_id_(&tx, id)
    }

    fn exists(&self, id: &str) -> Result<bool> {
        let tx = self.db.transaction();
        Ok(tx.get(make_data_value_key(NAMESPACE, id))?.is_some())
    }

    fn list(&self) -> Result<ListResponse<PullRequest>> {
        let tx = self.db.transaction();
        Ok(ListResponse::new(list_data(&tx, NAMESPACE)?))
    }

    fn list_by_reviewer(&self, user_id: &str) -> Result<Vec<PullRequestShort>> {
        let tx = self.db.transaction();
        let prefix = make_index_key(NAMESPACE, IDX_REVIEWER, user_id);
        let mut prs = list_key_suffixes(&tx, &prefix)?
            .iter()
            .map(|id| self.get_by_id_(&tx, id))
            .collect::<Result<Vec<_>>>()?;
        prs.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));

        Ok(prs.into_iter().map(PullRequestShort::from).collect())
    }

    fn set_reviewers(&self, id: &str, reviewers: Vec<String>) -> Result<PullRequest> {
        let tx = self.db.transaction();
        let mut pr = self.get_for_update_(&tx, id)?;
        if pr.status == Status::Merged {
            return Err(MetadataError::AlreadyMerged(format!(
                "pull request {id} is merged"
            )));
        }

        let prev_idx_keys = index_keys(&pr);
        pr.assigned_reviewers = reviewers;
        update_index(&tx, index_keys(&pr).as_ref(), prev_idx_keys.as_ref())?;
        self.put_(&tx, &pr)?;
        tx.commit()?;

        Ok(pr)
    }

    fn update(&self, id: &str, req: UpdatePullRequestRequest) -> Result<PullRequest> {
        let tx = self.db.transaction();
        let mut pr = self.get_for_update_(&tx, id)?;
        if let Some(name) = req.name {
            pr.name = name;
        }
        self.put_(&tx, &pr)?;
        tx.commit()?;

        Ok(pr)
    }

    fn merge(&self, id: &str) -> Result<PullRequest> {
        let tx = self.db.transaction();
        let mut pr = self.get_for_update_(&tx, id)?;
        if pr.status == Status::Merged {
            return Err(MetadataError::AlreadyMerged(format!(
                "pull request {id} is already merged"
            )));
        }

        pr.status = Status::Merged;
        pr.merged_at = Some(Utc::now());
        self.put_(&tx, &pr)?;
        tx.commit()?;

        Ok(pr)
    }

    fn delete(&self, id: &str) -> Result<PullRequest> {
        let tx = self.db.transaction();
        let pr = self.get_for_update_(&tx, id)?;
        tx.delete(make_data_value_key(NAMESPACE, id))?;
        delete_index(&tx, index_keys(&pr).as_ref())?;
        tx.commit()?;

        Ok(pr)
    }

    fn count_by_status(&self) -> Result<BTreeMap<Status, usize>> {
        let tx = self.db.transaction();
        let mut counts = BTreeMap::new();
        for pr in list_data::<PullRequest>(&tx, NAMESPACE)? {
            *counts.entry(pr.status).or_insert(0) += 1;
        }

        Ok(counts)
    }

    fn assignments_by_user(&self) -> Result<BTreeMap<String, usize>> {
        let tx = self.db.transaction();
        let mut counts = BTreeMap::new();
        for pr in list_data::<PullRequest>(&tx, NAMESPACE)? {
            for reviewer in pr.assigned_reviewers {
                *counts.entry(reviewer).or_insert(0) += 1;
            }
        }

        Ok(counts)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Status {
    #[serde(rename = "OPEN")]
    Open,
    #[serde(rename = "MERGED")]
    Merged,
}

impl Display for Status {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Status::Open => write!(f, "OPEN"),
            Status::Merged => write!(f, "MERGED"),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PullRequest {
    pub id: String,
    pub name: String,
    pub author_id: String,
    pub status: Status,
    pub assigned_reviewers: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub merged_at: Option<DateTime<Utc>>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PullRequestShort {
    pub id: String,
    pub name: String,
    pub author_id: String,
    pub status: Status,
}

impl From<PullRequest> for PullRequestShort {
    fn from(value: PullRequest) -> Self {
        PullRequestShort {
            id: value.id,
            name: value.name,
            author_id: value.author_id,
            status: value.status,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CreatePullRequestRequest {
    pub id: String,
    pub name: String,
    pub author_id: String,
    pub assigned_reviewers: Vec<String>,
}

impl CreatePullRequestRequest {
    pub fn into_pull_request(self, created_at: DateTime<Utc>) -> PullRequest {
        PullRequest {
            id: self.id,
            name: self.name,
            author_id: self.author_id,
            status: Status::Open,
            assigned_reviewers: self.assigned_reviewers,
            created_at,
            merged_at: None,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct UpdatePullRequestRequest {
    pub name: Option<String>,
}
