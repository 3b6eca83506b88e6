use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue, USER_AGENT};
use serde::Serialize;
use serde_json::Value;

use super::*;
use crate::InnertubeError;
use crate::context::{BROWSER_ACCEPT, BROWSER_USER_AGENT};

impl InnertubeClient {
    /// Headers that make the request look like a desktop browser.
    fn browser_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(BROWSER_ACCEPT));
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
        headers
    }

    /// Execute an unauthenticated GET and return the body text.
    pub(super) async fn get_page(&self, url: &str) -> Result<String, InnertubeError> {
        let mut headers = Self::browser_headers();
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("text/html; charset=UTF-8"),
        );
        let resp = self.http.get(url).headers(headers).send().await?;

        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            return Err(InnertubeError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(body)
    }

    /// Execute a POST with a JSON body and parse the JSON response.
    pub(super) async fn post_json(
        &self,
        url: &str,
        body: &impl Serialize,
    ) -> Result<Value, InnertubeError> {
        let resp = self
            .http
            .post(url)
            .headers(Self::browser_headers())
            .json(body)
            .send()
            .await?;

        let status = resp.status();
        let resp_body = resp.text().await?;

        if !status.is_success() {
            return Err(InnertubeError::Api {
                status: status.as_u16(),
                message: resp_body,
            });
        }

        Ok(serde_json::from_str(&resp_body)?)
    }
}
