use std::sync::Arc;

use clap::Parser;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use fredgate_core::{FredClient, ReqwestHttpClient};
use fredgate_keystore::{ApiKeyRecord, DuckDbKeyStore, KeyStore, MemoryKeyStore, StoreError};

use fredgate_server::cli::{Cli, Commands, KeysCommand};
use fredgate_server::config::{ConfigError, ServerConfig};
use fredgate_server::{build_router, AppState};

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("key provisioning requires FREDGATE_DB to be set")]
    NoDurableStore,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    const fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::NoDurableStore => 2,
            Self::Store(_) => 3,
            Self::Io(_) => 10,
        }
    }
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("fredgate=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() {
    init_tracing();

    if let Err(error) = run().await {
        eprintln!("error: {error}");
        std::process::exit(error.exit_code());
    }
}

async fn run() -> Result<(), CliError> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve => serve().await,
        Commands::Keys(args) => match args.command {
            KeysCommand::Add { key, limit } => keys_add(key, limit).await,
            KeysCommand::List => keys_list().await,
        },
    }
}

async fn serve() -> Result<(), CliError> {
    let config = ServerConfig::from_env()?;

    let store: Arc<dyn KeyStore> = match &config.db_path {
        Some(path) => Arc::new(DuckDbKeyStore::open(path)?),
        None => {
            tracing::warn!("FREDGATE_DB not set; using in-memory key store, keys are ephemeral");
            Arc::new(MemoryKeyStore::new())
        }
    };

    let fred = FredClient::new(Arc::new(ReqwestHttpClient::new()), config.fred_api_key.clone())
        .with_timeout_ms(config.upstream_timeout_ms);

    let app = build_router(AppState::new(store, Arc::new(fred)));

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "fredgate listening");
    axum::serve(listener, app).await?;
    Ok(())
}

async fn keys_add(key: String, limit: u32) -> Result<(), CliError> {
    let store = durable_store()?;
    let record = ApiKeyRecord::new(key, limit)?;
    let display_key = record.key.clone();
    store.insert(record).await?;
    println!("added key '{display_key}' with limit {limit}");
    Ok(())
}

async fn keys_list() -> Result<(), CliError> {
    let store = durable_store()?;
    let records = store.list().await?;
    if records.is_empty() {
        println!("no keys provisioned");
        return Ok(());
    }
    for record in records {
        println!(
            "{}\t{}/{} used",
            record.key, record.request_count, record.request_limit
        );
    }
    Ok(())
}

fn durable_store() -> Result<DuckDbKeyStore, CliError> {
    let path = std::env::var("FREDGATE_DB").map_err(|_| CliError::NoDurableStore)?;
    Ok(DuckDbKeyStore::open(path)?)
}
