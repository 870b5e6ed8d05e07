//! Submission rows and the aggregate derived from them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::CountryCode;

/// Maximum length of a display name, in characters.
pub const DISPLAY_NAME_MAX_CHARS: usize = 24;

/// A persisted submission.
///
/// Created once by the intake service and never updated or deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    /// Server-generated identifier.
    pub id: Uuid,
    /// Country the submitter picked.
    pub country_code: CountryCode,
    /// Display name of the country, as sent by the client.
    pub country_name: String,
    /// Optional submitter nickname. Never an empty string.
    pub display_name: Option<String>,
    /// Client-chosen opaque session token.
    pub session_id: String,
    /// Server-assigned insertion timestamp.
    pub created_at: DateTime<Utc>,
}

/// A validated submission that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSubmission {
    /// Validated country code.
    pub country_code: CountryCode,
    /// Country display name.
    pub country_name: String,
    /// Normalized display name (`None` when absent or empty).
    pub display_name: Option<String>,
    /// Client session token.
    pub session_id: String,
}

/// Number of submissions for one country.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CountryCount {
    /// Country code.
    #[schema(value_type = String, example = "FR")]
    pub country_code: CountryCode,
    /// Stored country name for the code.
    pub country_name: String,
    /// Number of submissions with this code.
    pub count: u64,
}

/// Per-country counts plus the grand total.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AggregateSnapshot {
    /// One entry per country with at least one submission, largest first.
    pub countries: Vec<CountryCount>,
    /// Sum of all counts.
    pub total: u64,
}

impl AggregateSnapshot {
    /// Builds a snapshot from per-country counts in any order.
    ///
    /// Entries are sorted by count descending, then code ascending, and
    /// zero-count entries are dropped.
    #[must_use]
    pub fn from_counts(mut countries: Vec<CountryCount>) -> Self {
        countries.retain(|c| c.count > 0);
        countries.sort_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then_with(|| a.country_code.cmp(&b.country_code))
        });
        let total = countries.iter().map(|c| c.count).sum();
        Self { countries, total }
    }

    /// Returns the count recorded for `code`, or zero.
    #[must_use]
    pub fn count_for(&self, code: CountryCode) -> u64 {
        self.countries
            .iter()
            .find(|c| c.country_code == code)
            .map_or(0, |c| c.count)
    }
}
