//! Common test utilities for integration tests.
//!
//! The application is assembled over the in-memory store with a settable
//! clock, so these tests need no database.

// Helpers are shared by several test binaries and not all of them use every one.
#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Method, Request},
    Router,
};
use chrono::{DateTime, TimeZone, Utc};
use domain::services::{FixedClock, InMemoryStore, RecordingNotifier};
use golf_signup_api::app::{create_app, AppParts, AppState, StoreBackend};
use golf_signup_api::config::Config;
use std::sync::Arc;
use tower::ServiceExt;

/// Tuesday 2026-10-20 10:00 Pacific. Sessions of 2026-10-26, 10-28 and 10-30
/// are open for sign-up; those of this week are not.
pub fn tuesday_morning() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 20, 18, 0, 0).unwrap()
}

/// Wednesday 2026-10-21 18:01 Pacific, just after next week's cutoff.
pub fn after_cutoff() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 22, 2, 1, 0).unwrap()
}

/// Sunday 2026-10-25 08:01 Pacific, past the cancellation deadline of Monday 2026-10-26.
pub fn after_monday_cancel_deadline() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 25, 16, 1, 0).unwrap()
}

/// Application under test together with handles to its collaborators.
pub struct TestApp {
    pub router: Router,
    pub clock: Arc<FixedClock>,
    pub notifier: Arc<RecordingNotifier>,
    pub store: Arc<InMemoryStore>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_overrides(&[])
    }

    /// Builds the app from test configuration with the given overrides.
    pub fn with_overrides(overrides: &[(&str, &str)]) -> Self {
        let config = Config::load_for_test(overrides).expect("Failed to load test config");
        let store = Arc::new(InMemoryStore::new());
        let clock = Arc::new(FixedClock::new(tuesday_morning()));
        let notifier = Arc::new(RecordingNotifier::new());

        let state = AppState::new(
            config,
            AppParts {
                sessions: store.clone(),
                members: store.clone(),
                notifier: notifier.clone(),
                clock: clock.clone(),
                backend: StoreBackend::Memory,
            },
        );

        Self {
            router: create_app(state),
            clock,
            notifier,
            store,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> axum::response::Response {
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// Sends a request and returns status and parsed JSON body.
    pub async fn call(&self, request: Request<Body>) -> (axum::http::StatusCode, serde_json::Value) {
        let response = self.send(request).await;
        let status = response.status();
        (status, parse_response_body(response).await)
    }

    /// Loads the rolling calendar and returns its events.
    pub async fn rolling_events(&self) -> Vec<serde_json::Value> {
        let (_, body) = self.call(get_request("/api/events/rolling")).await;
        body["events"].as_array().cloned().unwrap_or_default()
    }

    /// Id of the materialized session on `date` (YYYY-MM-DD).
    pub async fn event_id(&self, date: &str) -> String {
        self.rolling_events()
            .await
            .into_iter()
            .find(|e| e["date"] == date)
            .and_then(|e| e["id"].as_str().map(str::to_string))
            .unwrap_or_else(|| panic!("no session on {}", date))
    }

    /// Signs a member up and returns status and body.
    pub async fn sign_up(
        &self,
        event_id: &str,
        name: &str,
        email: &str,
        guest_name: Option<&str>,
    ) -> (axum::http::StatusCode, serde_json::Value) {
        let mut body = serde_json::json!({
            "event_id": event_id,
            "name": name,
            "email": email,
        });
        if let Some(guest) = guest_name {
            body["guest_name"] = serde_json::Value::String(guest.to_string());
        }
        self.call(json_request(Method::POST, "/api/signup", body)).await
    }

    pub async fn cancel(&self, signup_id: &str) -> (axum::http::StatusCode, serde_json::Value) {
        self.call(empty_request(
            Method::POST,
            &format!("/api/signup/{}/cancel", signup_id),
        ))
        .await
    }

    pub async fn roster(&self, event_id: &str) -> serde_json::Value {
        let (_, body) = self
            .call(get_request(&format!("/api/events/{}/roster", event_id)))
            .await;
        body
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

/// Email for the n-th test player.
pub fn player_email(n: usize) -> String {
    format!("player{}@example.com", n)
}

pub fn json_request(method: Method, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

pub fn get_request(uri: &str) -> Request<Body> {
    empty_request(Method::GET, uri)
}

pub fn empty_request(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Parse response body as JSON.
pub async fn parse_response_body(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null)
}
