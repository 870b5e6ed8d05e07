//! Fixed-window, per-session submission throttle.
//!
//! The decision is a single comparison between "now" and the session's
//! latest stored `created_at`. Two concurrent submissions from the same
//! session can both pass before either insert becomes visible; the window
//! throttles, it does not exclude.

use chrono::{DateTime, Duration, Utc};

use crate::error::TallyError;

/// Minimum spacing between submissions from one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    window: Duration,
}

impl RateLimitPolicy {
    /// Policy with a window of `window_secs` seconds. Zero disables it.
    #[must_use]
    pub fn new(window_secs: u64) -> Self {
        let secs = i64::try_from(window_secs).unwrap_or(i64::MAX / 1_000);
        Self {
            window: Duration::seconds(secs.min(i64::MAX / 1_000)),
        }
    }

    /// Window length in whole seconds.
    #[must_use]
    pub fn window_secs(&self) -> i64 {
        self.window.num_seconds()
    }

    /// Checks a session's latest submission time against `now`.
    ///
    /// # Errors
    ///
    /// Returns [`TallyError::RateLimited`] with the remaining wait, rounded
    /// up to whole seconds, when `now - last < window`.
    pub fn check(&self, last: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Result<(), TallyError> {
        let Some(last) = last else {
            return Ok(());
        };
        let elapsed = (now - last).max(Duration::zero());
        if elapsed >= self.window {
            return Ok(());
        }
        let remaining_ms = (self.window - elapsed).num_milliseconds();
        let retry_after_secs = u64::try_from(remaining_ms)
            .unwrap_or(0)
            .div_ceil(1_000)
            .max(1);
        Err(TallyError::RateLimited { retry_after_secs })
    }
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        Self::new(60)
    }
}
