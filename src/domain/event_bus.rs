//! Fan-out of submission events to live viewers.
//!
//! The intake path publishes one [`SubmissionEvent`] per stored row; each
//! WebSocket connection holds its own receiver and filters by country.
//! Viewers treat an event as a hint to refresh, so a slow viewer losing
//! events is tolerated: it sees `Lagged` and refetches the aggregate.

use tokio::sync::broadcast;

use super::SubmissionEvent;

/// Broadcast channel carrying [`SubmissionEvent`]s, cheap to clone.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<SubmissionEvent>,
}

impl EventBus {
    /// Creates a bus that buffers up to `capacity` undelivered events per
    /// viewer (at least one).
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Announces `event` to every connected viewer and returns how many
    /// were listening. With nobody listening the event is discarded.
    pub fn publish(&self, event: SubmissionEvent) -> usize {
        match self.sender.send(event) {
            Ok(viewers) => viewers,
            Err(broadcast::error::SendError(unsent)) => {
                tracing::trace!(
                    event_type = unsent.event_type_str(),
                    country = %unsent.country_code(),
                    "no viewers connected; event discarded"
                );
                0
            }
        }
    }

    /// Opens a receiver for events published from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<SubmissionEvent> {
        self.sender.subscribe()
    }

    /// Number of open receivers, i.e. connected viewers.
    #[must_use]
    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::{CountryCode, Submission};
    use chrono::Utc;

    fn make_event(raw: &str) -> SubmissionEvent {
        let Ok(country_code) = CountryCode::parse(raw) else {
            panic!("valid code");
        };
        SubmissionEvent::created(&Submission {
            id: uuid::Uuid::new_v4(),
            country_code,
            country_name: "Somewhere".to_string(),
            display_name: None,
            session_id: "s".to_string(),
            created_at: Utc::now(),
        })
    }

    #[test]
    fn publish_without_receivers_returns_zero() {
        let bus = EventBus::new(16);
        let count = bus.publish(make_event("FR"));
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn subscriber_receives_event() {
        let bus = EventBus::new(16);
        let mut rx = bus.subscribe();

        bus.publish(make_event("KE"));

        let Ok(event) = rx.recv().await else {
            panic!("expected to receive event");
        };
        assert_eq!(event.country_code().as_str(), "KE");
    }

    #[tokio::test]
    async fn multiple_subscribers_receive_same_event() {
        let bus = EventBus::new(16);
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        let count = bus.publish(make_event("BR"));
        assert_eq!(count, 2);

        let Ok(e1) = rx1.recv().await else {
            panic!("rx1 failed");
        };
        let Ok(e2) = rx2.recv().await else {
            panic!("rx2 failed");
        };
        assert_eq!(e1.country_code(), e2.country_code());
    }

    #[tokio::test]
    async fn lagging_receiver_reports_lag() {
        let bus = EventBus::new(2);
        let mut rx = bus.subscribe();
        for _ in 0..5 {
            bus.publish(make_event("FR"));
        }
        assert!(matches!(
            rx.recv().await,
            Err(broadcast::error::RecvError::Lagged(_))
        ));
    }

    #[test]
    fn receiver_count_tracks_subscribers() {
        let bus = EventBus::new(16);
        assert_eq!(bus.receiver_count(), 0);

        let rx1 = bus.subscribe();
        assert_eq!(bus.receiver_count(), 1);

        let _rx2 = bus.subscribe();
        assert_eq!(bus.receiver_count(), 2);

        drop(rx1);
        assert_eq!(bus.receiver_count(), 1);
    }

    #[tokio::test]
    async fn zero_capacity_is_clamped_to_one() {
        let bus = EventBus::new(0);
        let mut rx = bus.subscribe();
        assert_eq!(bus.publish(make_event("NZ")), 1);
        assert!(rx.recv().await.is_ok());
    }
}
