//! Channel lookups with a short-lived response cache in front of InnerTube.

use std::sync::Arc;
use std::time::Duration;

use channel_db::Database;
use innertube_client::{ChannelRecord, InnertubeClient, InnertubeError};
use moka::future::Cache;

use crate::config::AppConfig;
use crate::key_store::DbKeyStore;

#[derive(Clone)]
pub struct ChannelService {
    client: Arc<InnertubeClient>,
    cache: Cache<String, ChannelRecord>,
}

impl ChannelService {
    pub fn new(client: Arc<InnertubeClient>, ttl: Duration, max_entries: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_entries)
            .time_to_live(ttl)
            .build();
        Self { client, cache }
    }

    /// Build the client, its HTTP transport and the DB key store from config.
    pub fn from_config(db: &Database, config: &AppConfig) -> Result<Self, anyhow::Error> {
        let http = reqwest::Client::builder()
            .timeout(config.upstream_timeout())
            .build()?;
        let store = Arc::new(DbKeyStore::new(db.clone()));
        let client = InnertubeClient::with_http(http, config.endpoints(), store);
        Ok(Self::new(
            Arc::new(client),
            config.channel_cache_ttl(),
            config.channel_cache_max_entries,
        ))
    }

    /// Cached lookup. Failures are never cached.
    pub async fn get_channel(&self, channel_id: &str) -> Result<ChannelRecord, InnertubeError> {
        if let Some(record) = self.cache.get(channel_id).await {
            tracing::debug!(channel_id, "Channel cache hit");
            return Ok(record);
        }

        let record = self.client.get_channel(channel_id).await?;
        self.cache
            .insert(channel_id.to_string(), record.clone())
            .await;
        tracing::info!(channel_id, "Channel fetched");
        Ok(record)
    }

    pub async fn refresh_api_key(&self) -> Result<Option<String>, InnertubeError> {
        self.client.refresh_api_key().await
    }

    pub fn has_api_key(&self) -> Result<bool, InnertubeError> {
        self.client.has_api_key()
    }

    pub fn cached_channels(&self) -> u64 {
        self.cache.entry_count()
    }
}
