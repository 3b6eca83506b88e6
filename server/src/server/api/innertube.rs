//! Operator endpoint for the InnerTube API key.

use axum::extract::State;
use serde_json::json;

use super::{ApiResult, err_json, ok_json};
use crate::app::SharedState;

/// POST /api/innertube/refresh: scrape a new key even if one is stored.
///
/// On failure the stored key is left as it was.
pub async fn refresh_api_key(State(state): State<SharedState>) -> ApiResult {
    match state.channels().refresh_api_key().await {
        Ok(Some(_)) => Ok(ok_json(json!({ "refreshed": true }))),
        Ok(None) => Err(err_json(500, "Failed to fetch API key page")),
        Err(e) => {
            tracing::error!("API key refresh failed: {e}");
            Err(err_json(500, &e.to_string()))
        }
    }
}
