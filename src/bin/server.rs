use log::{error, info, warn};
use std::net::SocketAddr;
use std::sync::Arc;

use spectrum_connect::auth::TokenManager;
use spectrum_connect::config::ServerConfig;
use spectrum_connect::handlers::{routes, AppState};
use spectrum_connect::storage::{MemoryStorageProvider, StorageProvider};

#[tokio::main]
async fn main() {
    // Initialize env
    let dotenv_result = dotenvy::dotenv();

    // Initialize logging
    env_logger::init();

    match dotenv_result {
        Ok(path) => info!("Environment variables loaded from {}", path.display()),
        Err(e) => warn!("Failed to load .env file: {}", e),
    };

    // A missing or weak signing key must stop the process before it serves anything
    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    info!(
        "Configuration: host={}, port={}, algorithm={:?}, token lifetime={}m",
        config.host,
        config.port,
        config.auth.algorithm(),
        config.auth.token_lifetime().num_minutes()
    );

    let storage: Arc<dyn StorageProvider> = Arc::new(MemoryStorageProvider::new());
    if let Err(e) = storage.initialize().await {
        error!("Failed to initialize storage: {}", e);
        std::process::exit(1);
    }

    let tokens = Arc::new(TokenManager::new(&config.auth));
    let state = AppState::new(&config.auth, tokens, storage);

    // Build the server address
    let addr: SocketAddr = match format!("{}:{}", config.host, config.port).parse() {
        Ok(addr) => addr,
        Err(e) => {
            error!("Failed to parse server address: {}", e);
            std::process::exit(1);
        }
    };

    info!("Starting SpectrumConnect API on {}", addr);
    warp::serve(routes(state)).run(addr).await;
}
