use std::sync::{Arc, LazyLock};

use regex::Regex;

use super::*;
use crate::{InnertubeError, key_prefix};

static API_KEY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?im)"INNERTUBE_API_KEY":"(.*?)","#).expect("API key pattern should compile")
});

/// Pull the API key out of a scraped page. Empty values count as absent.
pub fn extract_api_key(page: &str) -> Option<&str> {
    API_KEY_PATTERN
        .captures(page)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .filter(|key| !key.is_empty())
}

/// Result of one scrape, shared by every caller that joined it.
pub(super) type RefreshOutcome = Result<Option<String>, InnertubeError>;

/// Hand a joined caller its own copy of the shared outcome.
///
/// A scrape only fails with a store error or a missing key; everything else
/// is already folded into `Ok(None)`.
fn replay(outcome: &RefreshOutcome) -> RefreshOutcome {
    match outcome {
        Ok(key) => Ok(key.clone()),
        Err(InnertubeError::Store(msg)) => Err(InnertubeError::Store(msg.clone())),
        Err(InnertubeError::TokenUnavailable(msg)) => {
            Err(InnertubeError::TokenUnavailable(msg.clone()))
        }
        Err(e) => Err(InnertubeError::TokenUnavailable(e.to_string())),
    }
}

impl InnertubeClient {
    /// Get the stored key, scraping a new one only when the store is empty.
    ///
    /// Concurrent callers that all find the store empty share one scrape and
    /// all see its outcome, success or failure.
    pub async fn api_key(&self) -> Result<String, InnertubeError> {
        if let Some(key) = self.store.load_key()? {
            return Ok(key);
        }

        self.shared_refresh(true).await?.ok_or_else(|| {
            InnertubeError::TokenUnavailable("no stored API key and refresh failed".into())
        })
    }

    /// Scrape a fresh key regardless of what is stored.
    ///
    /// Returns `Ok(None)` when the key page could not be fetched; the stored
    /// record is left untouched in that case.
    pub async fn refresh_api_key(&self) -> Result<Option<String>, InnertubeError> {
        self.shared_refresh(false).await
    }

    /// Join the refresh in flight, or start one.
    ///
    /// With `reuse_stored`, a key persisted since the caller last looked is
    /// returned without touching the key page.
    async fn shared_refresh(&self, reuse_stored: bool) -> RefreshOutcome {
        let cell = {
            let mut slot = self.refresh_slot.lock().await;
            slot.get_or_insert_with(Default::default).clone()
        };

        let outcome = cell
            .get_or_init(|| async {
                if reuse_stored {
                    match self.store.load_key() {
                        Ok(Some(key)) => {
                            tracing::debug!("API key already refreshed by another request; reusing it");
                            return Ok(Some(key));
                        }
                        Ok(None) => {}
                        Err(e) => return Err(e),
                    }
                }
                self.scrape_and_store().await
            })
            .await;

        {
            let mut slot = self.refresh_slot.lock().await;
            if slot.as_ref().is_some_and(|current| Arc::ptr_eq(current, &cell)) {
                *slot = None;
            }
        }

        replay(outcome)
    }

    /// Only called from inside [`Self::shared_refresh`].
    async fn scrape_and_store(&self) -> Result<Option<String>, InnertubeError> {
        let url = &self.endpoints.key_page_url;
        tracing::info!(url = %url, "Refreshing InnerTube API key");

        let page = match self.get_page(url).await {
            Ok(page) => page,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to fetch API key page");
                return Ok(None);
            }
        };

        let key = extract_api_key(&page).ok_or_else(|| {
            InnertubeError::TokenUnavailable("INNERTUBE_API_KEY not found in key page".into())
        })?;

        self.store.save_key(key)?;
        tracing::info!(key_prefix = key_prefix(key), "InnerTube API key refreshed");
        Ok(Some(key.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_key_from_page() {
        let page = r#"<script>ytcfg.set({"INNERTUBE_API_KEY":"ABC123","INNERTUBE_CLIENT_NAME":"WEB"});</script>"#;
        assert_eq!(extract_api_key(page), Some("ABC123"));
    }

    #[test]
    fn takes_first_match_non_greedily() {
        let page = r#""INNERTUBE_API_KEY":"FIRST","x":"y","INNERTUBE_API_KEY":"SECOND","#;
        assert_eq!(extract_api_key(page), Some("FIRST"));
    }

    #[test]
    fn missing_or_empty_key_is_none() {
        assert_eq!(extract_api_key("<html>no config here</html>"), None);
        assert_eq!(extract_api_key(r#""INNERTUBE_API_KEY":"","#), None);
        // Trailing comma is part of the pattern.
        assert_eq!(extract_api_key(r#""INNERTUBE_API_KEY":"ABC123"}"#), None);
    }
}
