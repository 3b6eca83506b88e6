use serde::Serialize;
use serde_json::Value;
use url::Url;

use super::*;
use crate::InnertubeError;
use crate::channel::{self, ChannelRecord};
use crate::context::{ClientIdentity, WEB_CLIENT};

/// Request body for POST /youtubei/v1/browse.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct BrowseRequest<'a> {
    pub(super) context: BrowseContext<'a>,
    pub(super) browse_id: &'a str,
    pub(super) params: &'static str,
}

#[derive(Debug, Serialize)]
pub(super) struct BrowseContext<'a> {
    pub(super) client: &'a ClientIdentity,
}

impl<'a> BrowseRequest<'a> {
    pub(super) fn new(browse_id: &'a str, section: Section) -> Self {
        Self {
            context: BrowseContext {
                client: &WEB_CLIENT,
            },
            browse_id,
            params: section.param(),
        }
    }
}

impl InnertubeClient {
    /// Browse endpoint URL with the key in the query string.
    pub(super) fn browse_url(&self, api_key: &str) -> Result<Url, InnertubeError> {
        let mut url = Url::parse(&self.endpoints.browse_url)?;
        url.query_pairs_mut().append_pair("key", api_key);
        Ok(url)
    }

    /// Fetch one raw view of a channel.
    ///
    /// Any failure is reported as [`InnertubeError::UpstreamFetchFailed`] with
    /// the underlying error attached.
    pub async fn browse(
        &self,
        api_key: &str,
        channel_id: &str,
        section: Section,
    ) -> Result<Value, InnertubeError> {
        let wrap = |source: InnertubeError| InnertubeError::UpstreamFetchFailed {
            section,
            source: Box::new(source),
        };

        let url = self.browse_url(api_key).map_err(wrap)?;
        let body = BrowseRequest::new(channel_id, section);
        let payload = self.post_json(url.as_str(), &body).await.map_err(wrap)?;
        tracing::debug!(channel_id, %section, "Fetched browse payload");
        Ok(payload)
    }

    /// Fetch the featured and about views with the same key, concurrently.
    ///
    /// Fails as soon as either call fails; no partial result is returned.
    pub async fn fetch_channel_payloads(
        &self,
        channel_id: &str,
    ) -> Result<(Value, Value), InnertubeError> {
        let api_key = self.api_key().await?;

        let (featured, about) = tokio::try_join!(
            self.browse(&api_key, channel_id, Section::Featured),
            self.browse(&api_key, channel_id, Section::About),
        )?;

        Ok((featured, about))
    }

    /// Look up a channel and normalize the upstream responses.
    pub async fn get_channel(&self, channel_id: &str) -> Result<ChannelRecord, InnertubeError> {
        let (featured, about) = match self.fetch_channel_payloads(channel_id).await {
            Ok(payloads) => payloads,
            Err(e) => {
                tracing::warn!(channel_id, error = %e, "Channel lookup failed");
                return Err(e);
            }
        };
        Ok(channel::normalize(&featured, &about))
    }
}
