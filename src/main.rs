mod context;
mod database;
mod notifications;
mod settings;
mod tokens;
mod webserver;

use anyhow::Result;
use clap::Parser;
use context::AppContext;
use settings::Settings;
use std::path::PathBuf;
use tracing::{debug, error};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(version, about = "Push token registry and notification dispatcher")]
struct Cli {
    /// Settings file; defaults to `settings.*` in the working directory
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_env("RUST_LOG"))
        .init();

    let cli = Cli::parse();
    let settings = match &cli.config {
        Some(path) => Settings::load_from_path(path)?,
        None => Settings::load()?,
    };
    let context = AppContext::from_settings(&settings).await?;

    debug!("starting webserver");
    if let Err(e) = webserver::start(&settings.webserver, context).await {
        error!("Webserver stopped: {:?}", e);
        return Err(e);
    }

    Ok(())
}
