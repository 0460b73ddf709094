use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use cmd::command::server;
use cmd::config::load as load_config;
use cmd::error::Error;
use cmd::error::Result;
use tracing::info;
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Clone)]
pub struct Cfg {
    #[arg(long)]
    config: PathBuf,
}

#[derive(Subcommand, Clone)]
enum Commands {
    /// Run server
    Server(Cfg),
}

#[derive(Parser)]
#[command(propagate_version = true)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    let Some(Commands::Server(args)) = args.command else {
        return Err(Error::BadRequest("no command specified".to_string()));
    };

    let cfg = load_config(&args.config)?;
    let subscriber = FmtSubscriber::builder()
        .with_max_level(tracing::level_filters::LevelFilter::from(cfg.log.level))
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Reviewer service v{}", env!("CARGO_PKG_VERSION"));

    server::start(cfg.try_into()?).await?;

    Ok(())
}
