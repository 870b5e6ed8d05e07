//! Intake service: validates, throttles, and stores one submission.

use std::sync::Arc;

use crate::domain::{
    AggregateSnapshot, Clock, CountryCode, DISPLAY_NAME_MAX_CHARS, EventBus, NewSubmission,
    Submission, SubmissionEvent,
};
use crate::error::{InvalidInputKind, TallyError};
use crate::persistence::StoreHandle;

use super::AggregationService;
use super::rate_limit::RateLimitPolicy;

/// Raw submission fields as received from a client.
///
/// Empty strings count as missing.
#[derive(Debug, Clone, Default)]
pub struct SubmitCommand {
    /// Two-letter country code.
    pub country_code: String,
    /// Country display name.
    pub country_name: String,
    /// Optional submitter nickname.
    pub display_name: Option<String>,
    /// Client session token.
    pub session_id: String,
}

/// Result of a stored submission.
#[derive(Debug, Clone)]
pub struct SubmitOutcome {
    /// The stored row.
    pub submission: Submission,
    /// Fresh aggregate, or `None` if re-reading it failed after the insert.
    pub stats: Option<AggregateSnapshot>,
}

/// Write side of the tally.
///
/// Every call follows the pattern: validate → rate-limit check → insert →
/// emit event → re-read the aggregate. Nothing is written unless all
/// checks pass, and nothing is retried.
#[derive(Debug, Clone)]
pub struct IntakeService {
    store: StoreHandle,
    aggregation: AggregationService,
    event_bus: EventBus,
    rate_limit: RateLimitPolicy,
    clock: Arc<dyn Clock>,
}

impl IntakeService {
    /// Creates a new `IntakeService`.
    #[must_use]
    pub fn new(
        store: StoreHandle,
        aggregation: AggregationService,
        event_bus: EventBus,
        rate_limit: RateLimitPolicy,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            aggregation,
            event_bus,
            rate_limit,
            clock,
        }
    }

    /// Returns a reference to the inner [`EventBus`].
    #[must_use]
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    /// Validates and stores a submission, returning the refreshed aggregate.
    ///
    /// # Errors
    ///
    /// - [`TallyError::InvalidInput`] for missing fields, a malformed
    ///   country code, or an over-long display name.
    /// - [`TallyError::RateLimited`] if the session submitted within the
    ///   window.
    /// - [`TallyError::ServiceUnavailable`] if the store is unconfigured or
    ///   unreachable.
    /// - [`TallyError::PersistenceError`] / [`TallyError::QueryFailed`] on
    ///   store failures before the row is written.
    pub async fn submit(&self, command: SubmitCommand) -> Result<SubmitOutcome, TallyError> {
        let new = validate(command)?;
        let store = self.store.store()?;

        let last = store.latest_for_session(&new.session_id).await?;
        if let Err(e) = self.rate_limit.check(last, self.clock.now()) {
            tracing::debug!(country = %new.country_code, "submission rate limited");
            return Err(e);
        }

        let submission = store.insert(&new).await?;
        tracing::info!(
            submission_id = %submission.id,
            country = %submission.country_code,
            "submission recorded"
        );

        let receivers = self
            .event_bus
            .publish(SubmissionEvent::created(&submission));
        tracing::trace!(receivers, "submission event published");

        let stats = match self.aggregation.snapshot().await {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                tracing::error!(error = %e, "aggregate refresh after insert failed");
                None
            }
        };

        Ok(SubmitOutcome { submission, stats })
    }
}

/// Runs the request-shape checks in order, short-circuiting on the first
/// failure.
///
/// # Errors
///
/// Returns [`TallyError::InvalidInput`] with the failing check.
pub fn validate(command: SubmitCommand) -> Result<NewSubmission, TallyError> {
    let SubmitCommand {
        country_code,
        country_name,
        display_name,
        session_id,
    } = command;

    if country_code.is_empty() || country_name.is_empty() || session_id.is_empty() {
        return Err(TallyError::InvalidInput(InvalidInputKind::MissingFields));
    }

    let country_code = CountryCode::parse(&country_code)?;

    let display_name = display_name.filter(|name| !name.is_empty());
    if display_name
        .as_ref()
        .is_some_and(|name| name.chars().count() > DISPLAY_NAME_MAX_CHARS)
    {
        return Err(TallyError::InvalidInput(
            InvalidInputKind::DisplayNameTooLong,
        ));
    }

    Ok(NewSubmission {
        country_code,
        country_name,
        display_name,
        session_id,
    })
}
