//! In-memory submissions store.
//!
//! Keeps rows in a `Vec` behind a [`tokio::sync::RwLock`]. Each insert is
//! serialized by the write lock, so a read issued after an insert always
//! observes it. Timestamps come from the injected [`Clock`].

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::SubmissionStore;
use crate::domain::{Clock, CountryCode, CountryCount, NewSubmission, Submission};
use crate::error::TallyError;

/// Volatile store used by tests and `STORE_BACKEND=memory`.
#[derive(Debug)]
pub struct InMemorySubmissionStore {
    rows: RwLock<Vec<Submission>>,
    clock: Arc<dyn Clock>,
}

impl InMemorySubmissionStore {
    /// Creates an empty store stamping rows with `clock`.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            rows: RwLock::new(Vec::new()),
            clock,
        }
    }

    /// Returns the number of stored rows.
    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    /// Returns `true` if nothing has been stored.
    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }
}

#[async_trait]
impl SubmissionStore for InMemorySubmissionStore {
    async fn insert(&self, submission: &NewSubmission) -> Result<Submission, TallyError> {
        let row = Submission {
            id: Uuid::new_v4(),
            country_code: submission.country_code,
            country_name: submission.country_name.clone(),
            display_name: submission.display_name.clone(),
            session_id: submission.session_id.clone(),
            created_at: self.clock.now(),
        };
        self.rows.write().await.push(row.clone());
        Ok(row)
    }

    async fn latest_for_session(
        &self,
        session_id: &str,
    ) -> Result<Option<DateTime<Utc>>, TallyError> {
        let rows = self.rows.read().await;
        Ok(rows
            .iter()
            .filter(|row| row.session_id == session_id)
            .map(|row| row.created_at)
            .max())
    }

    async fn country_counts(&self) -> Result<Vec<CountryCount>, TallyError> {
        let rows = self.rows.read().await;
        let mut groups: HashMap<CountryCode, CountryCount> = HashMap::new();
        for row in rows.iter() {
            groups
                .entry(row.country_code)
                .or_insert_with(|| CountryCount {
                    country_code: row.country_code,
                    country_name: row.country_name.clone(),
                    count: 0,
                })
                .count += 1;
        }
        Ok(groups.into_values().collect())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::ManualClock;
    use chrono::Duration;

    fn new_submission(code: &str, name: &str, session: &str) -> NewSubmission {
        let Ok(country_code) = CountryCode::parse(code) else {
            panic!("valid code");
        };
        NewSubmission {
            country_code,
            country_name: name.to_string(),
            display_name: None,
            session_id: session.to_string(),
        }
    }

    #[tokio::test]
    async fn insert_assigns_id_and_timestamp() {
        let start = Utc::now();
        let store = InMemorySubmissionStore::new(Arc::new(ManualClock::new(start)));
        let Ok(row) = store.insert(&new_submission("FR", "France", "abc")).await else {
            panic!("insert failed");
        };
        assert_eq!(row.created_at, start);
        assert_eq!(row.country_code.as_str(), "FR");
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn latest_for_session_picks_newest() {
        let start = Utc::now();
        let clock = Arc::new(ManualClock::new(start));
        let store = InMemorySubmissionStore::new(Arc::clone(&clock) as Arc<dyn Clock>);

        let _ = store.insert(&new_submission("FR", "France", "abc")).await;
        clock.advance(Duration::seconds(90));
        let _ = store.insert(&new_submission("FR", "France", "abc")).await;
        let _ = store.insert(&new_submission("DE", "Germany", "other")).await;

        let latest = store.latest_for_session("abc").await.ok().flatten();
        assert_eq!(latest, Some(start + Duration::seconds(90)));

        let none = store.latest_for_session("nobody").await.ok().flatten();
        assert!(none.is_none());
    }

    #[tokio::test]
    async fn counts_group_by_code() {
        let store = InMemorySubmissionStore::new(Arc::new(ManualClock::new(Utc::now())));
        assert!(store.is_empty().await);

        let _ = store.insert(&new_submission("FR", "France", "a")).await;
        let _ = store.insert(&new_submission("FR", "France", "b")).await;
        let _ = store.insert(&new_submission("JP", "Japan", "c")).await;

        let Ok(mut counts) = store.country_counts().await else {
            panic!("counts failed");
        };
        counts.sort_by(|a, b| a.country_code.cmp(&b.country_code));
        let summary: Vec<(&str, u64)> = counts
            .iter()
            .map(|c| (c.country_code.as_str(), c.count))
            .collect();
        assert_eq!(summary, vec![("FR", 2), ("JP", 1)]);
    }
}
