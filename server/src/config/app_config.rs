//! Runtime application configuration loaded from environment + settings DB.

use std::time::Duration;

use channel_db::Database;
use innertube_client::Endpoints;

use super::defaults::get_default;

/// Runtime configuration. Each value resolves as env var > settings table > default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub server_port: u16,
    pub key_page_url: String,
    pub browse_url: String,
    pub upstream_timeout_secs: u64,
    pub channel_cache_ttl_secs: u64,
    pub channel_cache_max_entries: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        let endpoints = Endpoints::default();
        Self {
            server_port: 8080,
            key_page_url: endpoints.key_page_url,
            browse_url: endpoints.browse_url,
            upstream_timeout_secs: 30,
            channel_cache_ttl_secs: 1200,
            channel_cache_max_entries: 200,
        }
    }
}

impl AppConfig {
    pub fn load(db: &Database) -> Result<Self, anyhow::Error> {
        let g = |key: &str| -> Result<String, anyhow::Error> {
            let stored = db.get_setting(key)?;
            Ok(resolve(std::env::var(key).ok(), stored, get_default(key)))
        };
        let defaults = Self::default();

        Ok(Self {
            server_port: parse_or(&g("SERVER_PORT")?, "SERVER_PORT", defaults.server_port),
            key_page_url: g("INNERTUBE_KEY_PAGE_URL")?,
            browse_url: g("INNERTUBE_BROWSE_URL")?,
            upstream_timeout_secs: parse_or(
                &g("UPSTREAM_TIMEOUT_SECS")?,
                "UPSTREAM_TIMEOUT_SECS",
                defaults.upstream_timeout_secs,
            ),
            channel_cache_ttl_secs: parse_or(
                &g("CHANNEL_CACHE_TTL_SECS")?,
                "CHANNEL_CACHE_TTL_SECS",
                defaults.channel_cache_ttl_secs,
            ),
            channel_cache_max_entries: parse_or(
                &g("CHANNEL_CACHE_MAX_ENTRIES")?,
                "CHANNEL_CACHE_MAX_ENTRIES",
                defaults.channel_cache_max_entries,
            ),
        })
    }

    pub fn endpoints(&self) -> Endpoints {
        Endpoints {
            key_page_url: self.key_page_url.clone(),
            browse_url: self.browse_url.clone(),
        }
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_secs)
    }

    pub fn channel_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.channel_cache_ttl_secs)
    }
}

/// Pick the first non-empty value among env, stored setting and default.
fn resolve(env: Option<String>, stored: Option<String>, default: Option<&str>) -> String {
    env.filter(|v| !v.trim().is_empty())
        .or_else(|| stored.filter(|v| !v.trim().is_empty()))
        .unwrap_or_else(|| default.unwrap_or_default().to_string())
}

fn parse_or<T: std::str::FromStr + Copy + std::fmt::Display>(s: &str, key: &str, default: T) -> T {
    match s.trim().parse() {
        Ok(v) => v,
        Err(_) => {
            tracing::warn!(key, value = s, %default, "Invalid setting value, using default");
            default
        }
    }
}
