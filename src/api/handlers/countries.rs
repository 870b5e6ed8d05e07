//! Country directory endpoints.

use axum::extract::Path;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};

use crate::app_state::AppState;
use crate::domain::{Country, country};
use crate::error::ErrorResponse;

/// `GET /countries` — Selectable countries in display order.
#[utoipa::path(
    get,
    path = "/api/v1/countries",
    tag = "Countries",
    summary = "List countries",
    description = "Returns every selectable country with its code, display name, and flag glyph.",
    responses(
        (status = 200, description = "Country options", body = Vec<Country>),
    )
)]
pub async fn list_countries() -> Json<&'static [Country]> {
    Json(country::all_options())
}

/// `GET /countries/{code}` — Look up one country.
#[utoipa::path(
    get,
    path = "/api/v1/countries/{code}",
    tag = "Countries",
    summary = "Look up a country",
    params(
        ("code" = String, Path, description = "Two-letter uppercase country code"),
    ),
    responses(
        (status = 200, description = "Country found", body = Country),
        (status = 404, description = "Unknown code", body = ErrorResponse),
    )
)]
pub async fn get_country(Path(code): Path<String>) -> Response {
    match country::lookup(&code) {
        Some(found) => Json(found).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                success: false,
                message: format!("Unknown country code: {code}"),
            }),
        )
            .into_response(),
    }
}

/// Country directory routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/countries", get(list_countries))
        .route("/countries/{code}", get(get_country))
}
