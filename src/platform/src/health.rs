use std::sync::Arc;

use metadata::users::Provider as MDUsers;
use serde::Deserialize;
use serde::Serialize;
use tracing::warn;

const PROBE_USER_ID: &str = "health-check";

pub struct Health {
    users: Arc<dyn MDUsers>,
}

impl Health {
    pub fn new(users: Arc<dyn MDUsers>) -> Self {
        Self { users }
    }

    /// Always reports the service itself as up; store failures only show in
    /// the database section.
    pub async fn check(&self) -> HealthStatus {
        let database = match self.users.exists(PROBE_USER_ID) {
            Ok(_) => ComponentStatus {
                status: "ok".to_string(),
                message: None,
            },
            Err(err) => {
                warn!("health check: store probe failed: {err}");
                ComponentStatus {
                    status: "error".to_string(),
                    message: Some(err.to_string()),
                }
            }
        };

        HealthStatus {
            status: "ok".to_string(),
            database,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ComponentStatus {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub message: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct HealthStatus {
    pub status: String,
    pub database: ComponentStatus,
}
