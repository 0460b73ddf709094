use std::net::SocketAddr;
use std::path::PathBuf;

use tracing::level_filters::LevelFilter;

#[derive(Debug, Clone)]
pub struct Server {
    pub host: SocketAddr,
}

#[derive(Debug, Clone)]
pub struct Data {
    pub path: PathBuf,
}

/// Static bearer tokens. The admin token grants every permission, the user
/// token everything except account management.
#[derive(Debug, Clone)]
pub struct Auth {
    pub admin_token: String,
    pub user_token: String,
}

#[derive(Debug, Clone)]
pub struct Log {
    pub level: LevelFilter,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server: Server,
    pub data: Data,
    pub auth: Auth,
    pub log: Log,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: Server {
                host: SocketAddr::from(([0, 0, 0, 0], 8080)),
            },
            data: Data {
                path: PathBuf::from("data"),
            },
            auth: Auth {
                admin_token: "admin-token".to_string(),
                user_token: "user-token".to_string(),
            },
            log: Log {
                level: LevelFilter::INFO,
            },
        }
    }
}
