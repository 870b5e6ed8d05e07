//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::config::TallyConfig;
use crate::domain::{Clock, EventBus};
use crate::persistence::StoreHandle;
use crate::service::{AggregationService, IntakeService, RateLimitPolicy};

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Submission intake (validation, rate limit, insert).
    pub intake_service: Arc<IntakeService>,
    /// Aggregate reads.
    pub aggregation_service: Arc<AggregationService>,
    /// Event bus for WebSocket subscriptions.
    pub event_bus: EventBus,
    /// Store handle, for health reporting.
    pub store: StoreHandle,
}

impl AppState {
    /// Wires the services around one store handle and one event bus.
    #[must_use]
    pub fn new(
        store: StoreHandle,
        event_bus: EventBus,
        rate_limit: RateLimitPolicy,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let aggregation = AggregationService::new(store.clone());
        let intake = IntakeService::new(
            store.clone(),
            aggregation.clone(),
            event_bus.clone(),
            rate_limit,
            clock,
        );
        Self {
            intake_service: Arc::new(intake),
            aggregation_service: Arc::new(aggregation),
            event_bus,
            store,
        }
    }

    /// Builds the state described by `config`.
    ///
    /// # Errors
    ///
    /// Propagates store construction failures (malformed database URL).
    pub async fn from_config(
        config: &TallyConfig,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, crate::error::TallyError> {
        let store = StoreHandle::from_config(&config.store, Arc::clone(&clock)).await?;
        Ok(Self::new(
            store,
            EventBus::new(config.event_bus_capacity),
            RateLimitPolicy::new(config.rate_limit_window_secs),
            clock,
        ))
    }
}
