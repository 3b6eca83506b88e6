use std::path::PathBuf;

use channel_db::Database;

use crate::app::SharedState;
use crate::config::AppConfig;
use crate::config::defaults::initialize_defaults;
use crate::services::channels::ChannelService;

/// Determine the data directory for the service.
/// Priority: CHANNEL_SERVICE_DATA_DIR env var > ~/.channel-service
pub fn data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("CHANNEL_SERVICE_DATA_DIR") {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".channel-service")
}

/// Load .env from multiple candidate paths.
fn load_dotenv() {
    let candidates = [".env", "../.env"];
    for path in &candidates {
        if dotenvy::from_filename(path).is_ok() {
            tracing::info!("Loaded .env from: {path}");
            return;
        }
    }
    tracing::info!("No .env file found, using system environment variables");
}

/// Open the database and resolve runtime config (fatal on error).
pub fn init_foundation() -> Result<(Database, AppConfig), anyhow::Error> {
    load_dotenv();
    let dir = data_dir();
    std::fs::create_dir_all(&dir)?;

    let db_path = dir.join("channel.db");
    tracing::info!("Opening database at {}", db_path.display());
    let db = Database::open(&db_path)?;

    initialize_defaults(&db)?;
    let config = AppConfig::load(&db)?;
    tracing::info!("Settings loaded (port={})", config.server_port);
    Ok((db, config))
}

/// Wire the InnerTube client, key store and response cache into shared state.
pub fn build_state(db: &Database, config: AppConfig) -> Result<SharedState, anyhow::Error> {
    let channels = ChannelService::from_config(db, &config)?;
    match channels.has_api_key() {
        Ok(true) => tracing::info!("Stored InnerTube API key found"),
        Ok(false) => tracing::info!("No stored InnerTube API key; it will be scraped on first lookup"),
        Err(e) => tracing::warn!("Could not read stored InnerTube API key: {e}"),
    }
    Ok(SharedState::new(config, channels))
}
