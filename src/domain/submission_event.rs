//! Domain events announcing new submissions.
//!
//! Every successful insert emits a [`SubmissionEvent`] through the
//! [`super::EventBus`]. Events are pushed to WebSocket subscribers, who
//! react by re-reading the aggregate. They carry no session id or display
//! name.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::{CountryCode, Submission};

/// Topic name WebSocket clients subscribe to for insert events.
pub const SUBMISSIONS_TOPIC: &str = "submissions";

/// Domain event emitted after a submission is stored.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum SubmissionEvent {
    /// A new row was appended to the submissions table.
    SubmissionCreated {
        /// Identifier of the new row.
        submission_id: Uuid,
        /// Country of the new row.
        country_code: CountryCode,
        /// Country name of the new row.
        country_name: String,
        /// Insertion timestamp.
        timestamp: DateTime<Utc>,
    },
}

impl SubmissionEvent {
    /// Builds the insert event for a stored submission.
    #[must_use]
    pub fn created(submission: &Submission) -> Self {
        Self::SubmissionCreated {
            submission_id: submission.id,
            country_code: submission.country_code,
            country_name: submission.country_name.clone(),
            timestamp: submission.created_at,
        }
    }

    /// Returns the country code associated with this event.
    #[must_use]
    pub fn country_code(&self) -> CountryCode {
        match self {
            Self::SubmissionCreated { country_code, .. } => *country_code,
        }
    }

    /// Returns the event type as a static string slice.
    #[must_use]
    pub const fn event_type_str(&self) -> &'static str {
        match self {
            Self::SubmissionCreated { .. } => "submission_created",
        }
    }
}
