use anyhow::anyhow;
use clap::Parser;
use snip_gateway::app::App;
use snip_gateway::cli::{StorageBackendArg, CLI};
use snip_gateway::state::AppState;
use snip_generator::AlphanumericGenerator;
use snip_shortener::{Shortener, ShortenerService};
use snip_storage::{MemoryUrlStore, SqliteUrlStore};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = CLI::try_parse()?;

    info!(
        listen_addr = %config.listen_addr,
        storage_backend = %config.storage,
        code_length = config.code_length,
        "starting gateway server"
    );

    let generator = AlphanumericGenerator::new(config.code_length);
    let shortener: Arc<dyn Shortener> = match config.storage {
        StorageBackendArg::Sqlite => {
            let db_path = config
                .db_path
                .ok_or_else(|| anyhow!("db path is required when storage backend is sqlite"))?;
            let store = SqliteUrlStore::connect(&db_path).await?;
            Arc::new(ShortenerService::new(store, generator))
        }
        StorageBackendArg::InMemory => {
            Arc::new(ShortenerService::new(MemoryUrlStore::new(), generator))
        }
    };

    let router = App::router(AppState::new(shortener));
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    info!(listen_addr = %listener.local_addr()?, "listening");
    axum::serve(listener, router).await?;

    Ok(())
}
