//! End-to-end tests for the `/ws` realtime channel.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]

mod common;

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

type Ws = WebSocketStream<MaybeTlsStream<TcpStream>>;

async fn connect(app: &common::TestApp) -> Ws {
    let (ws, _) = connect_async(app.ws_url()).await.expect("ws connect failed");
    ws
}

async fn send(ws: &mut Ws, payload: Value) {
    let msg = json!({ "id": "req-1", "type": "command", "payload": payload });
    ws.send(Message::text(msg.to_string()))
        .await
        .expect("ws send failed");
}

/// Reads the next text frame as JSON.
async fn next_json(ws: &mut Ws) -> Value {
    loop {
        let frame = tokio::time::timeout(Duration::from_secs(5), ws.next())
            .await
            .expect("timed out waiting for ws message")
            .expect("ws stream ended")
            .expect("ws read failed");
        if let Message::Text(text) = frame {
            return serde_json::from_str(&text).expect("ws message is not JSON");
        }
    }
}

#[tokio::test]
async fn subscriber_receives_event_then_snapshot() {
    let app = common::spawn_app().await;
    let mut ws = connect(&app).await;

    send(
        &mut ws,
        json!({
            "command": "subscribe",
            "topic": "submissions",
            "country_codes": ["*"],
            "refetch": true
        }),
    )
    .await;
    let ack = next_json(&mut ws).await;
    assert_eq!(ack["type"], "response");
    assert_eq!(ack["payload"]["wildcard"], true);

    let (_, status) = app.submit_country("KE", "Kenya", "viewer-test").await;
    assert_eq!(status, reqwest::StatusCode::OK);

    let event = next_json(&mut ws).await;
    assert_eq!(event["type"], "event");
    assert_eq!(event["payload"]["event_type"], "submission_created");
    assert_eq!(event["payload"]["country_code"], "KE");
    assert!(event["payload"].get("session_id").is_none());

    let snapshot = next_json(&mut ws).await;
    assert_eq!(snapshot["type"], "snapshot");
    assert_eq!(snapshot["payload"]["total"], 1);
    assert_eq!(snapshot["payload"]["countries"][0]["country_code"], "KE");
}

#[tokio::test]
async fn burst_on_tiny_bus_still_ends_with_full_snapshot() {
    let app = common::spawn_app_with_bus_capacity(1).await;
    let mut ws = connect(&app).await;

    send(
        &mut ws,
        json!({ "command": "subscribe", "country_codes": ["*"], "refetch": true }),
    )
    .await;
    let ack = next_json(&mut ws).await;
    assert_eq!(ack["payload"]["refetch"], true);

    let burst = 6;
    let submits = (0..burst).map(|i| {
        let app = &app;
        async move { app.submit_country("PT", "Portugal", &format!("burst-{i}")).await }
    });
    for (_, status) in futures_util::future::join_all(submits).await {
        assert_eq!(status, reqwest::StatusCode::OK);
    }

    // Whether events were dropped or not, a snapshot covering the whole
    // burst must arrive, and nothing but events and snapshots is pushed.
    loop {
        let msg = next_json(&mut ws).await;
        match msg["type"].as_str() {
            Some("event") => assert_eq!(msg["payload"]["country_code"], "PT"),
            Some("snapshot") => {
                if msg["payload"]["total"] == burst {
                    break;
                }
            }
            other => panic!("unexpected ws message type {other:?}"),
        }
    }
}

#[tokio::test]
async fn unsubscribe_stops_events() {
    let app = common::spawn_app().await;
    let mut ws = connect(&app).await;

    send(
        &mut ws,
        json!({ "command": "subscribe", "country_codes": ["IE", "IS"] }),
    )
    .await;
    next_json(&mut ws).await;

    send(&mut ws, json!({ "command": "unsubscribe", "country_codes": ["IE"] })).await;
    let reply = next_json(&mut ws).await;
    assert_eq!(reply["type"], "response");
    assert_eq!(reply["payload"]["remaining_count"], 1);

    app.submit_country("IE", "Ireland", "a").await;
    app.submit_country("IS", "Iceland", "b").await;

    let event = next_json(&mut ws).await;
    assert_eq!(event["payload"]["country_code"], "IS");
}

#[tokio::test]
async fn bad_command_payload_over_ws_is_bad_request() {
    let app = common::spawn_app().await;
    let mut ws = connect(&app).await;

    send(&mut ws, json!({ "command": "subscribe", "country_codes": "FR" })).await;
    let reply = next_json(&mut ws).await;
    assert_eq!(reply["type"], "error");
    assert_eq!(reply["payload"]["code"], 400);

    send(&mut ws, json!({ "command": "teleport" })).await;
    let reply = next_json(&mut ws).await;
    assert_eq!(reply["payload"]["code"], 404);
}

#[tokio::test]
async fn filtered_subscriber_skips_other_countries() {
    let app = common::spawn_app().await;
    let mut ws = connect(&app).await;

    send(
        &mut ws,
        json!({ "command": "subscribe", "country_codes": ["NZ"] }),
    )
    .await;
    let ack = next_json(&mut ws).await;
    assert_eq!(ack["payload"]["count"], 1);

    app.submit_country("AU", "Australia", "a").await;
    app.submit_country("NZ", "New Zealand", "b").await;

    let event = next_json(&mut ws).await;
    assert_eq!(event["type"], "event");
    assert_eq!(event["payload"]["country_code"], "NZ");
}

#[tokio::test]
async fn get_stats_over_ws() {
    let app = common::spawn_app().await;
    app.submit_country("CA", "Canada", "a").await;

    let mut ws = connect(&app).await;
    send(&mut ws, json!({ "command": "get_stats" })).await;

    let reply = next_json(&mut ws).await;
    assert_eq!(reply["type"], "snapshot");
    assert_eq!(reply["id"], "req-1");
    assert_eq!(reply["payload"]["total"], 1);
}

#[tokio::test]
async fn malformed_ws_message_gets_error() {
    let app = common::spawn_app().await;
    let mut ws = connect(&app).await;

    ws.send(Message::text("{oops")).await.expect("ws send failed");
    let reply = next_json(&mut ws).await;
    assert_eq!(reply["type"], "error");
    assert_eq!(reply["payload"]["code"], 400);
}
