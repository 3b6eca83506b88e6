use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::config::AppConfig;
use crate::services::channels::ChannelService;

/// Application shared state accessible from axum handlers.
#[derive(Clone)]
pub struct SharedState {
    inner: Arc<SharedStateInner>,
}

struct SharedStateInner {
    config: AppConfig,
    channels: ChannelService,
    /// Cancelled on Ctrl+C; stops the HTTP server.
    shutdown_token: CancellationToken,
}

impl SharedState {
    pub fn new(config: AppConfig, channels: ChannelService) -> Self {
        Self {
            inner: Arc::new(SharedStateInner {
                config,
                channels,
                shutdown_token: CancellationToken::new(),
            }),
        }
    }

    pub fn server_port(&self) -> u16 {
        self.inner.config.server_port
    }

    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    pub fn channels(&self) -> &ChannelService {
        &self.inner.channels
    }

    pub fn shutdown_token(&self) -> &CancellationToken {
        &self.inner.shutdown_token
    }
}
