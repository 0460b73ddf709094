use std::collections::BTreeMap;
use std::result;

use axum::response::IntoResponse;
use axum::response::Response;
use common::http::ApiError;
use common::http::CODE_CONFLICT;
use common::http::CODE_NOT_ASSIGNED;
use common::http::CODE_NO_CANDIDATE;
use common::http::CODE_NO_TEAM;
use common::http::CODE_PR_MERGED;
use metadata::error::MetadataError;
use thiserror::Error;

pub type Result<T> = result::Result<T, PlatformError>;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("authorization header required")]
    CantParseBearerHeader,
    #[error("invalid token")]
    InvalidToken,
}

/// Rejections of the reviewer assignment workflows. Each kind carries a
/// human readable detail.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssignmentError {
    #[error("no candidate reviewers available: {0}")]
    NoCandidateAvailable(String),
    #[error("reviewer is not assigned: {0}")]
    NotAssigned(String),
    #[error("invalid state: {0}")]
    InvalidState(String),
    #[error("no team: {0}")]
    NoTeam(String),
    #[error("author not found: {0}")]
    AuthorNotFound(String),
}

#[derive(Error, Debug)]
pub enum PlatformError {
    #[error("invalid fields")]
    InvalidFields(BTreeMap<String, String>),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("conflict: {1}")]
    Conflict(&'static str, String),
    #[error("internal: {0}")]
    Internal(String),
    #[error("assignment: {0}")]
    Assignment(#[from] AssignmentError),
    #[error("auth: {0}")]
    Auth(#[from] AuthError),
    #[error("metadata: {0}")]
    Metadata(#[from] MetadataError),
}

impl PlatformError {
    /// Turns a store `AlreadyExists` into a conflict carrying `code`, passing
    /// every other error through.
    pub fn already_exists_as(code: &'static str) -> impl Fn(MetadataError) -> PlatformError {
        move |err| match err {
            MetadataError::AlreadyExists(msg) => PlatformError::Conflict(code, msg),
            other => other.into(),
        }
    }

    pub fn into_api_error(self) -> ApiError {
        match self {
            PlatformError::InvalidFields(fields) => {
                ApiError::bad_request("invalid fields").with_fields(fields)
            }
            PlatformError::BadRequest(msg) => ApiError::bad_request(msg),
            PlatformError::Forbidden(msg) => ApiError::forbidden(msg),
            PlatformError::Conflict(code, msg) => ApiError::conflict(code, msg),
            PlatformError::Internal(msg) => ApiError::internal(msg),
            PlatformError::Assignment(err) => match &err {
                AssignmentError::NoCandidateAvailable(_) => {
                    ApiError::conflict(CODE_NO_CANDIDATE, &err)
                }
                AssignmentError::NotAssigned(_) => ApiError::conflict(CODE_NOT_ASSIGNED, &err),
                AssignmentError::InvalidState(_) => ApiError::conflict(CODE_PR_MERGED, &err),
                AssignmentError::NoTeam(_) => ApiError::conflict(CODE_NO_TEAM, &err),
                AssignmentError::AuthorNotFound(_) => ApiError::not_found(&err),
            },
            PlatformError::Auth(err) => ApiError::unauthorized(err),
            PlatformError::Metadata(err) => match err {
                MetadataError::NotFound(msg) => ApiError::not_found(msg),
                MetadataError::AlreadyExists(msg) => ApiError::conflict(CODE_CONFLICT, msg),
                MetadataError::AlreadyMerged(msg) => ApiError::conflict(CODE_PR_MERGED, msg),
                MetadataError::RocksDb(err) => ApiError::internal(err.to_string()),
                MetadataError::FromUtf8(err) => ApiError::internal(err.to_string()),
                MetadataError::Bincode(err) => ApiError::internal(err.to_string()),
            },
        }
    }
}

#[derive(Default)]
pub struct ValidationError {
    fields: BTreeMap<String, String>,
}

impl ValidationError {
    pub fn new() -> Self {
        Self {
            fields: BTreeMap::new(),
        }
    }

    pub fn push(&mut self, field: impl Into<String>, err: impl Into<String>) {
        self.fields.insert(field.into(), err.into());
    }

    pub fn push_empty(&mut self, field: impl Into<String>) {
        self.fields.insert(field.into(), "must not be empty".into());
    }

    pub fn result(self) -> Result<()> {
        if self.fields.is_empty() {
            Ok(())
        } else {
            Err(PlatformError::InvalidFields(self.fields))
        }
    }
}

impl IntoResponse for PlatformError {
    fn into_response(self) -> Response {
        self.into_api_error().into_response()
    }
}
