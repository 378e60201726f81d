//! colonia server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens the
//! configured record store, and serves the JSON API over HTTP.

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use colonia_core::{Registry, store::RecordStore};
use colonia_server::{ServerConfig, StoreBackend};
use colonia_store_json::JsonStore;
use colonia_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Colonia cat colony server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let server_cfg = ServerConfig::load(&cli.config)
    .with_context(|| format!("failed to load config from {:?}", cli.config))?;

  let store_path = server_cfg.store_path();
  let address = server_cfg.address();

  match server_cfg.store.backend {
    StoreBackend::Json => {
      let store = JsonStore::open(&store_path)
        .await
        .with_context(|| format!("failed to open json store at {store_path:?}"))?;
      serve(store, &address).await
    }
    StoreBackend::Sqlite => {
      let store = SqliteStore::open(&store_path)
        .await
        .with_context(|| format!("failed to open sqlite store at {store_path:?}"))?;
      serve(store, &address).await
    }
  }
}

async fn serve<S>(store: S, address: &str) -> anyhow::Result<()>
where
  S: RecordStore + 'static,
{
  let app = colonia_server::app(Registry::new(Arc::new(store)));

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}
