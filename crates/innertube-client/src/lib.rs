//! YouTube InnerTube client library.
//!
//! Scrapes and caches the InnerTube API key, issues browse calls for a
//! channel and normalizes the responses into a [`channel::ChannelRecord`].

pub mod api;
pub mod channel;
pub mod context;
pub mod store;

pub use api::{Endpoints, InnertubeClient, Section};
pub use channel::ChannelRecord;
pub use store::{KeyStore, MemoryKeyStore};

/// Unified error type for the innertube-client crate.
#[derive(Debug, thiserror::Error)]
pub enum InnertubeError {
    /// Never carries the request URL, since browse URLs embed the key.
    #[error("HTTP request failed: {0}")]
    Http(#[source] reqwest::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// The key page could not be scraped, or the store is empty and a
    /// refresh produced nothing.
    #[error("InnerTube API key unavailable: {0}")]
    TokenUnavailable(String),

    #[error("InnerTube API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Failed to fetch {section} view: {source}")]
    UpstreamFetchFailed {
        section: Section,
        source: Box<InnertubeError>,
    },

    #[error("Key store error: {0}")]
    Store(String),
}

impl From<reqwest::Error> for InnertubeError {
    fn from(e: reqwest::Error) -> Self {
        Self::Http(e.without_url())
    }
}

impl InnertubeError {
    /// Status code of the underlying upstream response, if any.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            InnertubeError::Api { status, .. } => Some(*status),
            InnertubeError::Http(e) => e.status().map(|s| s.as_u16()),
            InnertubeError::UpstreamFetchFailed { source, .. } => source.upstream_status(),
            _ => None,
        }
    }
}

/// First few characters of a key, for log lines.
pub(crate) fn key_prefix(key: &str) -> &str {
    let end = key
        .char_indices()
        .nth(6)
        .map(|(idx, _)| idx)
        .unwrap_or(key.len());
    &key[..end]
}
