//! Aggregate-read endpoint handler.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::StatsResponse;
use crate::app_state::AppState;

/// `GET /stats` — Per-country counts and total.
///
/// Failures answer with the same body shape, an empty list, and a zero
/// total.
#[utoipa::path(
    get,
    path = "/api/v1/stats",
    tag = "Submissions",
    summary = "Read the aggregate",
    description = "Returns one entry per country with at least one submission, largest first, plus the grand total.",
    responses(
        (status = 200, description = "Current aggregate", body = StatsResponse),
        (status = 500, description = "Aggregate query failed", body = StatsResponse),
        (status = 503, description = "Store unconfigured or unreachable", body = StatsResponse),
    )
)]
pub async fn stats(State(state): State<AppState>) -> Response {
    match state.aggregation_service.snapshot().await {
        Ok(snapshot) => (StatusCode::OK, Json(StatsResponse::ok(snapshot))).into_response(),
        Err(e) => {
            e.log();
            (
                e.status_code(),
                Json(StatsResponse::failed(e.public_message())),
            )
                .into_response()
        }
    }
}

/// Aggregate routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/stats", get(stats))
}
