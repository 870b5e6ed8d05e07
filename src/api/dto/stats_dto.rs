//! Aggregate-read DTOs.

use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{AggregateSnapshot, CountryCount};

/// Response body for `GET /api/v1/stats`, on success and on failure.
///
/// Failures keep the same shape with an empty list and a zero total so
/// that viewers can render an empty chart.
#[derive(Debug, Serialize, ToSchema)]
pub struct StatsResponse {
    /// Whether the aggregate was read.
    pub success: bool,
    /// Failure reason; absent on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Per-country counts, largest first.
    pub countries: Vec<CountryCount>,
    /// Sum of all counts.
    pub total: u64,
}

impl StatsResponse {
    /// Successful response wrapping `snapshot`.
    #[must_use]
    pub fn ok(snapshot: AggregateSnapshot) -> Self {
        Self {
            success: true,
            message: None,
            countries: snapshot.countries,
            total: snapshot.total,
        }
    }

    /// Failure response with an empty aggregate.
    #[must_use]
    pub fn failed(message: String) -> Self {
        Self {
            success: false,
            message: Some(message),
            countries: Vec::new(),
            total: 0,
        }
    }
}
