//! Service layer: business logic orchestration.
//!
//! [`IntakeService`] validates, throttles, and stores submissions and emits
//! events through the [`super::domain::EventBus`]. [`AggregationService`]
//! computes per-country totals.

pub mod aggregation_service;
pub mod intake_service;
pub mod rate_limit;

pub use aggregation_service::AggregationService;
pub use intake_service::{IntakeService, SubmitCommand, SubmitOutcome};
pub use rate_limit::RateLimitPolicy;
