//! Aggregation service: per-country totals across all submissions.

use crate::domain::AggregateSnapshot;
use crate::error::TallyError;
use crate::persistence::StoreHandle;

/// Read side of the tally.
///
/// Stateless: every call re-reads the store, so two calls with no write in
/// between return identical snapshots.
#[derive(Debug, Clone)]
pub struct AggregationService {
    store: StoreHandle,
}

impl AggregationService {
    /// Creates a new `AggregationService`.
    #[must_use]
    pub fn new(store: StoreHandle) -> Self {
        Self { store }
    }

    /// Computes the current snapshot.
    ///
    /// Countries come back largest count first, ties broken by code.
    ///
    /// # Errors
    ///
    /// [`TallyError::ServiceUnavailable`] when no store is configured or it
    /// cannot be reached, [`TallyError::QueryFailed`] when the read fails.
    pub async fn snapshot(&self) -> Result<AggregateSnapshot, TallyError> {
        let counts = self.store.store()?.country_counts().await?;
        let snapshot = AggregateSnapshot::from_counts(counts);
        tracing::debug!(
            countries = snapshot.countries.len(),
            total = snapshot.total,
            "aggregate computed"
        );
        Ok(snapshot)
    }
}
