use actix::prelude::*;
use clap::Parser;
use log::{error, info};
use std::sync::Arc;

use chess_session_server::services::{GameStore, JsonFileStore, MemoryIdentities, MemoryStore};
use chess_session_server::{ChessListener, ServerConfig, SessionManager};

#[actix_rt::main]
async fn main() -> std::io::Result<()> {
    let config = ServerConfig::parse();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or(config.log_level.as_str()));

    let store: Arc<dyn GameStore> = match &config.archive_dir {
        Some(dir) => match JsonFileStore::new(dir) {
            Ok(store) => {
                info!("Archiving completed games to {}", store.dir().display());
                Arc::new(store)
            }
            Err(e) => {
                error!("Cannot use archive directory {}: {}", dir.display(), e);
                return Err(std::io::Error::new(std::io::ErrorKind::Other, e));
            }
        },
        None => {
            info!("No archive directory configured, completed games stay in memory");
            Arc::new(MemoryStore::new())
        }
    };

    let manager = SessionManager::new(store, Arc::new(MemoryIdentities::new())).start();
    let (local_addr, _listener) = ChessListener::bind(&config, manager).await?;
    info!("Starting chess session server at {}", local_addr);

    tokio::signal::ctrl_c().await?;
    info!("Shutting down");
    System::current().stop();
    Ok(())
}
