#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use chrono::Utc;
use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

use country_tally::app_state::AppState;
use country_tally::domain::{Clock, EventBus, ManualClock};
use country_tally::persistence::{InMemorySubmissionStore, StoreHandle};
use country_tally::service::RateLimitPolicy;

/// A running test server backed by an in-memory store and a manual clock.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub clock: Arc<ManualClock>,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn ws_url(&self) -> String {
        format!("ws://{}/ws", self.addr)
    }

    /// POST a JSON body to `/api/v1/submit`, return (body, status).
    pub async fn submit(&self, body: &Value) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url("/api/v1/submit"))
            .json(body)
            .send()
            .await
            .expect("submit request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// Submit `code` for `session` with the directory name for the code.
    pub async fn submit_country(&self, code: &str, name: &str, session: &str) -> (Value, StatusCode) {
        self.submit(&json!({
            "country_code": code,
            "country_name": name,
            "session_id": session,
        }))
        .await
    }

    /// GET a path, return (body, status).
    pub async fn get(&self, path: &str) -> (Value, StatusCode) {
        let resp = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("get request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }
}

/// Spawn a test app with a fresh in-memory store.
pub async fn spawn_app() -> TestApp {
    spawn_app_with_bus_capacity(64).await
}

/// Spawn a test app whose event bus holds at most `capacity` events.
pub async fn spawn_app_with_bus_capacity(capacity: usize) -> TestApp {
    let clock = Arc::new(ManualClock::new(Utc::now()));
    let store = StoreHandle::configured(InMemorySubmissionStore::new(
        Arc::clone(&clock) as Arc<dyn Clock>
    ));
    serve(store, clock, capacity).await
}

/// Spawn a test app with no store configured.
pub async fn spawn_unconfigured_app() -> TestApp {
    let clock = Arc::new(ManualClock::new(Utc::now()));
    serve(StoreHandle::Unconfigured, clock, 64).await
}

async fn serve(store: StoreHandle, clock: Arc<ManualClock>, capacity: usize) -> TestApp {
    let state = AppState::new(
        store,
        EventBus::new(capacity),
        RateLimitPolicy::default(),
        Arc::clone(&clock) as Arc<dyn Clock>,
    );
    let app = country_tally::app(state);

    // Bind to random port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().expect("listener has no address");

    // Spawn server in background
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("server error");
    });

    TestApp {
        addr,
        client: Client::new(),
        clock,
    }
}
