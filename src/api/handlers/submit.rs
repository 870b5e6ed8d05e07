//! Intake endpoint handler.

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};

use crate::api::dto::{SubmitRequest, SubmitResponse};
use crate::app_state::AppState;
use crate::error::{ErrorResponse, InvalidInputKind, TallyError};

/// `POST /submit` — Record one submission.
///
/// # Errors
///
/// Returns [`TallyError`] on invalid input, rate limiting, or store
/// failure.
#[utoipa::path(
    post,
    path = "/api/v1/submit",
    tag = "Submissions",
    summary = "Submit a country",
    description = "Validates and stores one submission, then returns the refreshed per-country aggregate. A session may submit at most once per rate-limit window.",
    request_body = SubmitRequest,
    responses(
        (status = 200, description = "Submission recorded", body = SubmitResponse),
        (status = 400, description = "Missing fields, invalid country code, or display name too long", body = ErrorResponse),
        (status = 429, description = "Session submitted too recently", body = ErrorResponse),
        (status = 500, description = "Submission could not be saved", body = ErrorResponse),
        (status = 503, description = "Store unconfigured or unreachable", body = ErrorResponse),
    )
)]
pub async fn submit(
    State(state): State<AppState>,
    body: Result<Json<SubmitRequest>, JsonRejection>,
) -> Result<impl IntoResponse, TallyError> {
    let Json(req) = body.map_err(|rejection| {
        tracing::debug!(error = %rejection, "rejected submit body");
        TallyError::InvalidInput(InvalidInputKind::MalformedBody)
    })?;

    let outcome = state.intake_service.submit(req.into()).await?;

    Ok(Json(SubmitResponse {
        success: true,
        message: "Submission recorded".to_string(),
        stats: outcome.stats,
    }))
}

/// Intake routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/submit", post(submit))
}
