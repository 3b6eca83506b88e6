//! Channel lookup endpoint.

use axum::Json;
use axum::extract::{Path, State};
use serde_json::Value;

use innertube_client::{ChannelRecord, InnertubeError};

use super::err_json;
use crate::app::SharedState;

/// Every lookup failure is reported as one internal-error class.
pub(super) fn map_lookup_error(err: InnertubeError) -> (axum::http::StatusCode, Json<Value>) {
    err_json(500, &format!("Error fetching channel: {err}"))
}

/// GET /api/channels/{id}
pub async fn get_channel(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<ChannelRecord>, (axum::http::StatusCode, Json<Value>)> {
    if id.trim().is_empty() {
        return Err(err_json(400, "channel id is required"));
    }

    state
        .channels()
        .get_channel(&id)
        .await
        .map(Json)
        .map_err(map_lookup_error)
}
