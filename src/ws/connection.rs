//! WebSocket connection state machine.
//!
//! Handles the read/write loop for a single WebSocket connection,
//! dispatching incoming commands and forwarding filtered events. Clients
//! that subscribed with `refetch` receive a fresh aggregate snapshot after
//! every matching event, and once more after the bus reports lost events.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::broadcast;

use super::messages::{WsCommand, WsMessage, WsMessageType};
use super::subscription::SubscriptionManager;
use crate::domain::{CountryCode, SUBMISSIONS_TOPIC, SubmissionEvent};
use crate::service::AggregationService;

/// Runs the read/write loop for a single WebSocket connection.
///
/// - Reads commands from the client and dispatches them.
/// - Forwards matching events from the [`broadcast::Receiver`] to the client.
pub async fn run_connection(
    socket: WebSocket,
    mut event_rx: broadcast::Receiver<SubmissionEvent>,
    aggregation: Arc<AggregationService>,
) {
    let (mut ws_tx, mut ws_rx) = socket.split();
    let mut subs = SubscriptionManager::new();

    loop {
        tokio::select! {
            // Incoming message from client
            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        let reply = handle_text_message(&text, &mut subs, &aggregation).await;
                        if ws_tx.send(Message::text(reply.to_json())).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    _ => {}
                }
            }
            // Event from EventBus
            event = event_rx.recv() => {
                let Some(outbound) = handle_bus_event(event, &subs, &aggregation).await else {
                    break;
                };
                let mut sent = true;
                for msg in outbound {
                    if ws_tx.send(Message::text(msg.to_json())).await.is_err() {
                        sent = false;
                        break;
                    }
                }
                if !sent {
                    break;
                }
            }
        }
    }

    tracing::debug!("ws connection closed");
}

/// Turns one receive from the event bus into the messages owed to the
/// client. Returns `None` once the bus is closed.
///
/// A matching event yields the event itself, then a snapshot if the client
/// asked for refetches. A lag yields a single snapshot in place of the
/// missed events.
pub async fn handle_bus_event(
    event: Result<SubmissionEvent, broadcast::error::RecvError>,
    subs: &SubscriptionManager,
    aggregation: &AggregationService,
) -> Option<Vec<WsMessage>> {
    let mut outbound = Vec::new();
    match event {
        Ok(submission_event) => {
            if subs.matches(submission_event.country_code()) {
                outbound.push(WsMessage::new(
                    uuid::Uuid::new_v4().to_string(),
                    WsMessageType::Event,
                    serde_json::to_value(&submission_event).unwrap_or_default(),
                ));
                if subs.wants_refetch() {
                    outbound.push(snapshot_message(String::new(), aggregation).await);
                }
            }
        }
        Err(broadcast::error::RecvError::Lagged(n)) => {
            tracing::warn!(lagged = n, "ws client lagged behind event bus");
            if subs.is_active() && subs.wants_refetch() {
                outbound.push(snapshot_message(String::new(), aggregation).await);
            }
        }
        Err(broadcast::error::RecvError::Closed) => return None,
    }
    Some(outbound)
}

/// Handles a text message from the client and returns the reply.
pub async fn handle_text_message(
    text: &str,
    subs: &mut SubscriptionManager,
    aggregation: &AggregationService,
) -> WsMessage {
    let Ok(msg) = serde_json::from_str::<WsMessage>(text) else {
        return WsMessage::error(String::new(), 400, "malformed JSON");
    };
    if msg.msg_type != WsMessageType::Command {
        return WsMessage::error(msg.id, 400, "expected a command message");
    }
    let known = msg
        .payload
        .get("command")
        .and_then(serde_json::Value::as_str)
        .is_some_and(|name| WsCommand::NAMES.contains(&name));
    if !known {
        return WsMessage::error(msg.id, 404, "unknown command");
    }
    let command = match serde_json::from_value::<WsCommand>(msg.payload) {
        Ok(command) => command,
        Err(e) => {
            tracing::debug!(error = %e, "rejected ws command payload");
            return WsMessage::error(msg.id, 400, "invalid command payload");
        }
    };

    match command {
        WsCommand::Subscribe {
            topic,
            country_codes,
            refetch,
        } => {
            if topic != SUBMISSIONS_TOPIC {
                return WsMessage::error(msg.id, 404, "unknown topic");
            }
            let (codes, wildcard) = parse_codes(&country_codes);
            subs.subscribe(&codes, wildcard, refetch);
            tracing::debug!(
                count = subs.count(),
                wildcard = subs.is_subscribed_all(),
                refetch,
                "ws client subscribed"
            );
            WsMessage::new(
                msg.id,
                WsMessageType::Response,
                serde_json::json!({
                    "topic": SUBMISSIONS_TOPIC,
                    "subscribed": codes.iter().map(CountryCode::as_str).collect::<Vec<_>>(),
                    "count": subs.count(),
                    "wildcard": subs.is_subscribed_all(),
                    "refetch": subs.wants_refetch(),
                }),
            )
        }
        WsCommand::Unsubscribe { country_codes } => {
            let (codes, wildcard) = parse_codes(&country_codes);
            subs.unsubscribe(&codes, wildcard);
            WsMessage::new(
                msg.id,
                WsMessageType::Response,
                serde_json::json!({
                    "unsubscribed": codes.iter().map(CountryCode::as_str).collect::<Vec<_>>(),
                    "remaining_count": subs.count(),
                    "wildcard": subs.is_subscribed_all(),
                }),
            )
        }
        WsCommand::GetStats => snapshot_message(msg.id, aggregation).await,
    }
}

/// Splits raw codes into parsed codes and a wildcard flag. Invalid codes
/// are skipped.
fn parse_codes(raw: &[String]) -> (Vec<CountryCode>, bool) {
    let mut codes = Vec::new();
    let mut wildcard = false;
    for value in raw {
        if value == "*" {
            wildcard = true;
        } else if let Ok(code) = CountryCode::parse(value) {
            codes.push(code);
        }
    }
    (codes, wildcard)
}

/// Reads the aggregate and wraps it as a snapshot message, or an error
/// message if the read fails.
async fn snapshot_message(id: String, aggregation: &AggregationService) -> WsMessage {
    match aggregation.snapshot().await {
        Ok(snapshot) => WsMessage::new(
            id,
            WsMessageType::Snapshot,
            serde_json::to_value(&snapshot).unwrap_or_default(),
        ),
        Err(err) => {
            err.log();
            WsMessage::error(id, err.status_code().as_u16(), &err.public_message())
        }
    }
}
