use std::net::SocketAddr;
use std::path::Path;
use std::path::PathBuf;

use clap::ValueEnum;
use config::builder::DefaultState;
use config::ConfigBuilder;
use config::Environment;
use config::Source;
use serde_derive::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing::Level;

use crate::error::Error;

const ENV_PREFIX: &str = "REVIEWER";

#[derive(Debug, Deserialize, PartialEq, Eq)]
pub struct Server {
    pub host: SocketAddr,
}

#[derive(Debug, Deserialize, PartialEq, Eq)]
pub struct Data {
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, PartialEq, Eq)]
pub struct Auth {
    pub admin_token: String,
    pub user_token: String,
}

#[derive(Debug, Deserialize, PartialEq, Eq)]
pub struct Log {
    pub level: LogLevel,
}

#[derive(Debug, Deserialize, PartialEq, Eq)]
pub struct Config {
    pub server: Server,
    pub data: Data,
    pub auth: Auth,
    pub log: Log,
}

fn defaults() -> crate::error::Result<ConfigBuilder<DefaultState>> {
    let def = common::config::Config::default();

    Ok(config::Config::builder()
        .set_default("server.host", def.server.host.to_string())?
        .set_default("data.path", def.data.path.to_string_lossy().to_string())?
        .set_default("auth.admin_token", def.auth.admin_token)?
        .set_default("auth.user_token", def.auth.user_token)?
        .set_default("log.level", "info")?)
}

fn load_from<S>(source: S) -> crate::error::Result<Config>
where S: Source + Send + Sync + 'static {
    let config = defaults()?
        .add_source(source)
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    Ok(config.try_deserialize()?)
}

/// Reads the TOML file at `path`. Missing keys fall back to the defaults and
/// `REVIEWER_<SECTION>__<KEY>` environment variables override both.
pub fn load(path: &Path) -> crate::error::Result<Config> {
    load_from(config::File::from(path))
}

impl TryInto<common::config::Config> for Config {
    type Error = Error;

    fn try_into(self) -> Result<common::config::Config, Self::Error> {
        if self.auth.admin_token.trim().is_empty() || self.auth.user_token.trim().is_empty() {
            return Err(Error::BadRequest("auth tokens must not be empty".to_string()));
        }
        if self.auth.admin_token == self.auth.user_token {
            return Err(Error::BadRequest(
                "admin and user tokens must differ".to_string(),
            ));
        }

        Ok(common::config::Config {
            server: common::config::Server {
                host: self.server.host,
            },
            data: common::config::Data {
                path: self.data.path,
            },
            auth: common::config::Auth {
                admin_token: self.auth.admin_token,
                user_token: self.auth.user_token,
            },
            log: common::config::Log {
                level: self.log.level.into(),
            },
        })
    }
}

#[derive(Deserialize, Copy, Debug, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum LogLevel {
    #[serde(rename = "trace")]
    Trace,
    #[serde(rename = "debug")]
    Debug,
    #[serde(rename = "info")]
    Info,
    #[serde(rename = "warn")]
    Warn,
    #[serde(rename = "error")]
    Error,
}

impl From<LogLevel> for LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
        .into()
    }
}
