//! admin-dash web server
//!
//! Serves the admin dashboard pages over HTTP.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

use admin_dash::logging::{self, LogOutput};
use admin_dash::{ApiClient, AppState, Config, FileStore};

#[derive(Parser)]
#[command(name = "admin-dash")]
#[command(about = "Admin dashboard web server", long_about = None)]
#[command(version)]
struct Args {
    /// Config file (defaults to the standard locations)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the bind address host
    #[arg(long)]
    host: Option<String>,

    /// Override the bind address port
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = Config::load_default(args.config.as_deref())?;
    if let Some(host) = args.host {
        config.web.host = host;
    }
    if let Some(port) = args.port {
        config.web.port = port;
    }

    logging::init(&config.logging, LogOutput::Stdout);

    tracing::info!("admin-dash v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(store = %config.storage.path, api = %config.api.base_url, "Starting");

    let store = Arc::new(
        FileStore::open(&config.storage.path)
            .with_context(|| format!("opening store {}", config.storage.path))?,
    );
    let api = Arc::new(ApiClient::new(config.api.client_config())?);

    let state = AppState::new(store, api, config.auth.token_issuer());
    let restored = state.session.restore();
    if let Some(identity) = &restored.identity {
        tracing::info!(email = %identity.email, "Resuming previous session");
    }

    admin_dash::serve(state, &config.bind_addr()).await?;
    Ok(())
}
