//! # country-tally
//!
//! REST API and WebSocket backend for a community "where are you from?"
//! widget.
//!
//! Visitors submit the country they are from (optionally with a display
//! name); the service validates the entry, enforces one submission per
//! session per rate-limit window, appends it to the submissions store, and
//! pushes an insert event to live viewers. Anyone can read the per-country
//! aggregate.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP, WebSocket)
//!     │
//!     ├── REST Handlers (api/)
//!     ├── WS Handler (ws/)
//!     │
//!     ├── IntakeService / AggregationService (service/)
//!     ├── EventBus, CountryDirectory (domain/)
//!     │
//!     └── SubmissionStore: PostgreSQL or in-memory (persistence/)
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod service;
pub mod session;
pub mod ws;

use std::time::Duration;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::get;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::app_state::AppState;

/// Default per-request timeout used by [`app`].
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Builds the full application with the default request timeout.
pub fn app(state: AppState) -> Router {
    app_with_timeout(state, DEFAULT_REQUEST_TIMEOUT)
}

/// Builds the full application: REST routes, the `/ws` endpoint, request
/// tracing, a request timeout and permissive CORS, bound to `state`.
///
/// The timeout bounds the HTTP exchange only; upgraded WebSocket
/// connections outlive it.
pub fn app_with_timeout(state: AppState, timeout: Duration) -> Router {
    Router::new()
        .merge(api::build_router())
        .route("/ws", get(ws::handler::ws_handler))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::with_status_code(
                    StatusCode::REQUEST_TIMEOUT,
                    timeout,
                ))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
