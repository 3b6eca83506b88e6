use axum::{
    Router,
    extract::State,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;

use super::api;
use crate::app::SharedState;

/// Create the axum router with all routes.
pub fn create_router(state: SharedState) -> Router {
    Router::new()
        .route("/status", get(status_handler))
        .route("/api/channels/{id}", get(api::channels::get_channel))
        .route("/api/innertube/refresh", post(api::innertube::refresh_api_key))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// GET /status. A failed key store read is reported, not hidden.
async fn status_handler(State(state): State<SharedState>) -> api::ApiResult {
    let has_api_key = match state.channels().has_api_key() {
        Ok(has_key) => has_key,
        Err(e) => {
            tracing::error!("Status check could not read the key store: {e}");
            return Err(api::err_json(500, &e.to_string()));
        }
    };
    Ok(axum::Json(serde_json::json!({
        "status": "ok",
        "service": "channel-service",
        "version": env!("CARGO_PKG_VERSION"),
        "hasApiKey": has_api_key,
        "cachedChannels": state.channels().cached_channels(),
    })))
}
