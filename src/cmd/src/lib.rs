use std::fs;
use std::sync::Arc;

use axum::Router;
use common::config::Config;
use metadata::MetadataProvider;
use platform::PlatformProvider;
use tracing::info;

pub mod command;
pub mod config;
pub mod error;

pub fn init_fs(cfg: &Config) -> error::Result<()> {
    if !cfg.data.path.exists() {
        info!("creating data directory {:?}", cfg.data.path);
    }
    fs::create_dir_all(&cfg.data.path)?;

    Ok(())
}

pub fn init_platform(md: Arc<MetadataProvider>, router: Router, cfg: Config) -> Router {
    let platform_provider = Arc::new(PlatformProvider::new(md));

    info!("attaching platform routes...");
    platform::http::attach_routes(router, &platform_provider, cfg)
}
