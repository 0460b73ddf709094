use std::sync::Arc;

use rocksdb::TransactionDB;
use serde::Deserialize;
use serde::Serialize;

use crate::pull_requests;
use crate::teams;
use crate::users;
use crate::Result;

pub struct MetadataProvider {
    pub users: Arc<dyn users::Provider>,
    pub teams: Arc<dyn teams::Provider>,
    pub pull_requests: Arc<dyn pull_requests::Provider>,
}

impl MetadataProvider {
    pub fn try_new(db: Arc<TransactionDB>) -> Result<Self> {
        Ok(MetadataProvider {
            users: Arc::new(users::ProviderImpl::new(db.clone())),
            teams: Arc::new(teams::ProviderImpl::new(db.clone())),
            pull_requests: Arc::new(pull_requests::ProviderImpl::new(db)),
        })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ResponseMetadata {
    pub next: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ListResponse<T> {
    pub data: Vec<T>,
    pub meta: ResponseMetadata,
}

impl<T> ListResponse<T> {
    pub fn new(data: Vec<T>) -> Self {
        ListResponse {
            data,
            meta: ResponseMetadata { next: None },
        }
    }
}
