use std::sync::Arc;

use metadata::MetadataProvider;
use tokio::sync::RwLock;

use crate::health::Health;
use crate::pull_requests::PullRequests;
use crate::statistics::Statistics;
use crate::teams::Teams;
use crate::users::Users;

pub struct PlatformProvider {
    pub teams: Arc<Teams>,
    pub users: Arc<Users>,
    pub pull_requests: Arc<PullRequests>,
    pub statistics: Arc<Statistics>,
    pub health: Arc<Health>,
}

impl PlatformProvider {
    pub fn new(md: Arc<MetadataProvider>) -> Self {
        // serializes reviewer reads and writes across services
        let guard = Arc::new(RwLock::new(()));

        Self {
            teams: Arc::new(Teams::new(md.teams.clone(), guard.clone())),
            users: Arc::new(Users::new(
                md.users.clone(),
                md.pull_requests.clone(),
                guard.clone(),
            )),
            pull_requests: Arc::new(PullRequests::new(
                md.pull_requests.clone(),
                md.users.clone(),
                guard,
            )),
            health: Arc::new(Health::new(md.users.clone())),
            statistics: Arc::new(Statistics::new(md)),
        }
    }
}
