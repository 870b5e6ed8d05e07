//! Intake DTOs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::AggregateSnapshot;
use crate::service::SubmitCommand;

/// Request body for `POST /api/v1/submit`.
///
/// Every field is optional at the JSON level so that a missing field is
/// reported as "missing required fields" rather than a parse failure.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct SubmitRequest {
    /// Two uppercase letters, e.g. `"FR"`.
    #[serde(default)]
    #[schema(example = "FR")]
    pub country_code: Option<String>,
    /// Country display name.
    #[serde(default)]
    #[schema(example = "France")]
    pub country_name: Option<String>,
    /// Optional nickname, at most 24 characters.
    #[serde(default)]
    pub display_name: Option<String>,
    /// Client session token.
    #[serde(default)]
    pub session_id: Option<String>,
}

impl From<SubmitRequest> for SubmitCommand {
    fn from(req: SubmitRequest) -> Self {
        Self {
            country_code: req.country_code.unwrap_or_default(),
            country_name: req.country_name.unwrap_or_default(),
            display_name: req.display_name,
            session_id: req.session_id.unwrap_or_default(),
        }
    }
}

/// Response body for a stored submission.
#[derive(Debug, Serialize, ToSchema)]
pub struct SubmitResponse {
    /// Always `true`.
    pub success: bool,
    /// Confirmation message.
    pub message: String,
    /// Refreshed aggregate; omitted if it could not be read.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<AggregateSnapshot>,
}
