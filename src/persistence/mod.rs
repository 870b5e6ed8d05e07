//! Persistence layer: the append-only submissions store.
//!
//! [`SubmissionStore`] is the seam to the external store. The service layer
//! only ever appends rows, asks for a session's latest timestamp, and reads
//! per-country counts. Two implementations exist: PostgreSQL via
//! `sqlx::PgPool`, and an in-memory store for tests and local runs.
//!
//! The store is reached through a [`StoreHandle`], which makes the
//! "no store configured" case an explicit value instead of a missing global.

pub mod memory;
pub mod postgres;

use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

pub use memory::InMemorySubmissionStore;
pub use postgres::PostgresSubmissionStore;

use crate::config::StoreConfig;
use crate::domain::{Clock, CountryCount, NewSubmission, Submission};
use crate::error::TallyError;

/// Append-only storage for submissions.
#[async_trait]
pub trait SubmissionStore: Debug + Send + Sync {
    /// Appends a row, assigning its id and `created_at`.
    ///
    /// # Errors
    ///
    /// [`TallyError::PersistenceError`] on write failure, or
    /// [`TallyError::ServiceUnavailable`] if the store cannot be reached.
    async fn insert(&self, submission: &NewSubmission) -> Result<Submission, TallyError>;

    /// Returns the latest `created_at` recorded for `session_id`.
    ///
    /// # Errors
    ///
    /// [`TallyError::QueryFailed`] on read failure, or
    /// [`TallyError::ServiceUnavailable`] if the store cannot be reached.
    async fn latest_for_session(
        &self,
        session_id: &str,
    ) -> Result<Option<DateTime<Utc>>, TallyError>;

    /// Returns one count per country with at least one row, in no
    /// particular order.
    ///
    /// # Errors
    ///
    /// [`TallyError::QueryFailed`] on read failure, or
    /// [`TallyError::ServiceUnavailable`] if the store cannot be reached.
    async fn country_counts(&self) -> Result<Vec<CountryCount>, TallyError>;

    /// Short backend name for health output.
    fn backend(&self) -> &'static str;
}

/// Handle to the configured store, or the explicit absence of one.
#[derive(Debug, Clone)]
pub enum StoreHandle {
    /// A usable store.
    Configured(Arc<dyn SubmissionStore>),
    /// No store was configured; every operation is unavailable.
    Unconfigured,
}

impl StoreHandle {
    /// Wraps a concrete store.
    #[must_use]
    pub fn configured(store: impl SubmissionStore + 'static) -> Self {
        Self::Configured(Arc::new(store))
    }

    /// Builds the handle described by `config`.
    ///
    /// PostgreSQL pools connect lazily, so an unreachable database does not
    /// prevent startup; requests report it as unavailable instead.
    /// Migrations run when enabled and the database answers.
    ///
    /// # Errors
    ///
    /// Returns [`TallyError::Internal`] if the database URL is malformed.
    pub async fn from_config(
        config: &StoreConfig,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, TallyError> {
        match config {
            StoreConfig::Unconfigured => {
                tracing::warn!("no store configured; intake and stats will report unavailable");
                Ok(Self::Unconfigured)
            }
            StoreConfig::Memory => {
                tracing::info!("using in-memory submission store");
                Ok(Self::configured(InMemorySubmissionStore::new(clock)))
            }
            StoreConfig::Postgres(settings) => {
                let store = PostgresSubmissionStore::connect_lazy(settings, clock)?;
                if settings.run_migrations {
                    match store.migrate().await {
                        Ok(()) => tracing::info!("database migrations applied"),
                        Err(e) => tracing::warn!(error = %e, "database migrations not applied"),
                    }
                }
                Ok(Self::configured(store))
            }
        }
    }

    /// Returns the store, or [`TallyError::ServiceUnavailable`].
    ///
    /// # Errors
    ///
    /// Fails when no store is configured.
    pub fn store(&self) -> Result<&Arc<dyn SubmissionStore>, TallyError> {
        match self {
            Self::Configured(store) => Ok(store),
            Self::Unconfigured => Err(TallyError::ServiceUnavailable),
        }
    }

    /// Returns `true` when a store is available.
    #[must_use]
    pub const fn is_configured(&self) -> bool {
        matches!(self, Self::Configured(_))
    }

    /// Backend name, or `"unconfigured"`.
    #[must_use]
    pub fn backend(&self) -> &'static str {
        match self {
            Self::Configured(store) => store.backend(),
            Self::Unconfigured => "unconfigured",
        }
    }
}
