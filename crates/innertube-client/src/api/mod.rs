//! InnerTube browse client.
//!
//! Owns the key refresh path (page scrape + store write, single-flight)
//! and the two-call channel lookup against the browse endpoint.

mod browse;
mod key;
mod request;
#[cfg(test)]
mod tests;

use std::fmt;
use std::sync::Arc;

use tokio::sync::{Mutex, OnceCell};

pub use key::extract_api_key;
use key::RefreshOutcome;

use crate::store::KeyStore;

/// Public channel page whose HTML embeds the current API key.
pub const DEFAULT_KEY_PAGE_URL: &str = "https://www.youtube.com/channel/UCGkmcEne_L9uynfi44aW4Fw";

pub const DEFAULT_BROWSE_URL: &str = "https://www.youtube.com/youtubei/v1/browse";

/// Upstream URLs used by the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub key_page_url: String,
    pub browse_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            key_page_url: DEFAULT_KEY_PAGE_URL.into(),
            browse_url: DEFAULT_BROWSE_URL.into(),
        }
    }
}

/// Channel view selected by the browse call's `params` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Featured,
    /// Reserved; channel lookups do not request it.
    Videos,
    About,
}

impl Section {
    /// Opaque section code, sent as-is.
    pub fn param(self) -> &'static str {
        match self {
            Section::Featured => "EghmZWF0dXJlZA%3D%3D",
            Section::Videos => "EgZ2aWRlb3M%3D",
            Section::About => "EgVhYm91dA%3D%3D",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Section::Featured => "featured",
            Section::Videos => "videos",
            Section::About => "about",
        })
    }
}

/// InnerTube client with a persistent key store behind it.
pub struct InnertubeClient {
    pub(super) http: reqwest::Client,
    pub(super) endpoints: Endpoints,
    pub(super) store: Arc<dyn KeyStore>,
    /// The refresh currently in flight, if any. Callers that arrive while it
    /// runs await its outcome instead of starting their own scrape.
    pub(super) refresh_slot: Mutex<Option<Arc<OnceCell<RefreshOutcome>>>>,
}

impl InnertubeClient {
    pub fn new(store: Arc<dyn KeyStore>) -> Self {
        Self::with_http(reqwest::Client::new(), Endpoints::default(), store)
    }

    pub fn with_http(http: reqwest::Client, endpoints: Endpoints, store: Arc<dyn KeyStore>) -> Self {
        Self {
            http,
            endpoints,
            store,
            refresh_slot: Mutex::new(None),
        }
    }

    /// Whether the store currently holds a key. Never triggers a refresh.
    pub fn has_api_key(&self) -> Result<bool, crate::InnertubeError> {
        Ok(self.store.load_key()?.is_some())
    }
}
