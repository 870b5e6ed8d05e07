//! Per-connection subscription manager.
//!
//! Tracks which country codes a WebSocket client follows on the
//! submissions topic, and whether it wants a snapshot pushed after each
//! matching event.

use std::collections::HashSet;

use crate::domain::CountryCode;

/// Manages the subscription state for a single WebSocket connection.
#[derive(Debug, Default)]
pub struct SubscriptionManager {
    /// Followed codes. If `subscribe_all` is true, this set is ignored.
    country_codes: HashSet<CountryCode>,
    /// Whether the client follows every country (wildcard `"*"`).
    subscribe_all: bool,
    /// Whether to push a refreshed snapshot after each matching event.
    refetch: bool,
}

impl SubscriptionManager {
    /// Creates a new empty subscription manager.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds codes to the subscription set and enables the wildcard if
    /// asked. `refetch` replaces the previous setting.
    pub fn subscribe(&mut self, codes: &[CountryCode], wildcard: bool, refetch: bool) {
        if wildcard {
            self.subscribe_all = true;
        }
        self.country_codes.extend(codes.iter().copied());
        self.refetch = refetch;
    }

    /// Removes codes from the subscription set. `wildcard` clears
    /// everything, including the wildcard itself.
    pub fn unsubscribe(&mut self, codes: &[CountryCode], wildcard: bool) {
        if wildcard {
            self.subscribe_all = false;
            self.country_codes.clear();
            return;
        }
        for code in codes {
            self.country_codes.remove(code);
        }
    }

    /// Returns `true` if the given code matches the subscription filter.
    #[must_use]
    pub fn matches(&self, code: CountryCode) -> bool {
        self.subscribe_all || self.country_codes.contains(&code)
    }

    /// Returns `true` if anything at all is followed.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.subscribe_all || !self.country_codes.is_empty()
    }

    /// Returns whether snapshots should follow matching events.
    #[must_use]
    pub fn wants_refetch(&self) -> bool {
        self.refetch
    }

    /// Returns the number of explicitly followed codes.
    #[must_use]
    pub fn count(&self) -> usize {
        self.country_codes.len()
    }

    /// Returns `true` if the wildcard subscription is active.
    #[must_use]
    pub fn is_subscribed_all(&self) -> bool {
        self.subscribe_all
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn code(raw: &str) -> CountryCode {
        let Ok(code) = CountryCode::parse(raw) else {
            panic!("valid code");
        };
        code
    }

    #[test]
    fn empty_matches_nothing() {
        let mgr = SubscriptionManager::new();
        assert!(!mgr.matches(code("FR")));
        assert!(!mgr.is_active());
    }

    #[test]
    fn subscribe_specific_country() {
        let mut mgr = SubscriptionManager::new();
        mgr.subscribe(&[code("FR")], false, false);
        assert!(mgr.matches(code("FR")));
        assert!(!mgr.matches(code("DE")));
    }

    #[test]
    fn wildcard_matches_everything() {
        let mut mgr = SubscriptionManager::new();
        mgr.subscribe(&[], true, true);
        assert!(mgr.matches(code("FR")));
        assert!(mgr.matches(code("JP")));
        assert!(mgr.wants_refetch());
    }

    #[test]
    fn unsubscribe_removes_country() {
        let mut mgr = SubscriptionManager::new();
        mgr.subscribe(&[code("FR")], false, false);
        mgr.unsubscribe(&[code("FR")], false);
        assert!(!mgr.matches(code("FR")));
    }

    #[test]
    fn unsubscribe_wildcard_clears_all() {
        let mut mgr = SubscriptionManager::new();
        mgr.subscribe(&[code("FR"), code("DE")], true, false);
        mgr.unsubscribe(&[], true);
        assert!(!mgr.is_active());
        assert_eq!(mgr.count(), 0);
    }

    #[test]
    fn count_tracks_explicit() {
        let mut mgr = SubscriptionManager::new();
        assert_eq!(mgr.count(), 0);
        mgr.subscribe(&[code("FR"), code("US"), code("FR")], false, false);
        assert_eq!(mgr.count(), 2);
    }
}
