use std::sync::Arc;

use axum::Router;
use common::config::Config;
use common::DATA_PATH_METADATA;
use metadata::MetadataProvider;
use tokio::select;
use tokio::signal::unix::signal;
use tokio::signal::unix::SignalKind;
use tracing::debug;
use tracing::info;

use crate::error::Result;
use crate::init_fs;
use crate::init_platform;

pub async fn start(cfg: Config) -> Result<()> {
    debug!("db path: {:?}", cfg.data.path);

    init_fs(&cfg)?;
    let rocks = Arc::new(metadata::rocksdb::new(
        cfg.data.path.join(DATA_PATH_METADATA),
    )?);
    let md = Arc::new(MetadataProvider::try_new(rocks)?);

    info!("initializing platform...");
    let router = init_platform(md, Router::new(), cfg.clone());

    let mut sig_int = signal(SignalKind::interrupt())?;
    let mut sig_term = signal(SignalKind::terminate())?;
    let shutdown = async move {
        select! {
            _ = sig_int.recv() => info!("SIGINT received"),
            _ = sig_term.recv() => info!("SIGTERM received"),
        }
    };

    info!("listening on http://{}", cfg.server.host);
    let listener = tokio::net::TcpListener::bind(cfg.server.host).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await?;
    info!("server stopped");

    Ok(())
}
