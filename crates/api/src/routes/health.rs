//! Liveness banner endpoint.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::app::AppState;

/// Banner response for the server root.
#[derive(Debug, Serialize)]
pub struct BannerResponse {
    pub message: String,
}

/// Root endpoint confirming the API is up.
///
/// GET /
pub async fn home(State(state): State<AppState>) -> Json<BannerResponse> {
    let prefix = state.config.server.api_prefix.trim_end_matches('/');
    Json(BannerResponse {
        message: format!("User directory API is running. Use {prefix}/users to manage records."),
    })
}
