//! Integration tests for the calendar endpoints.
//!
//! Tests cover:
//! - GET /api/events/rolling
//! - GET /api/events/week/:offset
//! - POST /api/generate-weekly-events
//! - GET /api/events/:event_id/roster

mod common;

use axum::http::{Method, StatusCode};
use chrono::{TimeZone, Utc};
use common::{empty_request, get_request, TestApp};

fn dates(events: &[serde_json::Value]) -> Vec<String> {
    events
        .iter()
        .map(|e| e["date"].as_str().unwrap().to_string())
        .collect()
}

// =============================================================================
// GET /api/events/rolling Tests
// =============================================================================

#[tokio::test]
async fn test_rolling_events_from_today() {
    let app = TestApp::new();

    let (status, body) = app.call(get_request("/api/events/rolling")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["week1_start"], "2026-10-19");
    assert_eq!(body["week1_end"], "2026-10-25");
    assert_eq!(body["week2_start"], "2026-10-26");
    assert_eq!(body["week2_end"], "2026-11-01");

    let events = body["events"].as_array().unwrap();
    assert_eq!(
        dates(events),
        vec![
            "2026-10-21",
            "2026-10-23",
            "2026-10-26",
            "2026-10-28",
            "2026-10-30"
        ]
    );
}

#[tokio::test]
async fn test_rolling_event_fields() {
    let app = TestApp::new();
    let events = app.rolling_events().await;

    let monday = events.iter().find(|e| e["date"] == "2026-10-26").unwrap();
    assert_eq!(monday["day_of_week"], "Monday");
    assert_eq!(monday["max_players"], 16);
    assert_eq!(monday["current_signups"], 0);
    assert_eq!(monday["available_spots"], 16);
    assert_eq!(monday["is_full"], false);
    assert_eq!(monday["is_cutoff_passed"], false);
    assert_eq!(monday["can_cancel"], true);
    // Wednesday 2026-10-21 18:00 Pacific
    assert_eq!(monday["cutoff_datetime"], "2026-10-22T02:00:00Z");
    // Sunday 2026-10-25 08:00 Pacific
    assert_eq!(monday["cancellation_deadline"], "2026-10-25T16:00:00Z");
    assert_eq!(monday["confirmed_players"], serde_json::json!([]));
    assert_eq!(monday["waitlist_players"], serde_json::json!([]));

    let wednesday = events.iter().find(|e| e["date"] == "2026-10-21").unwrap();
    assert_eq!(wednesday["is_cutoff_passed"], true);
}

#[tokio::test]
async fn test_rolling_events_include_players() {
    let app = TestApp::new();
    let event_id = app.event_id("2026-10-28").await;
    app.sign_up(&event_id, "Kathy Whitworth", "kathy@example.com", None)
        .await;

    let events = app.rolling_events().await;
    let wednesday = events.iter().find(|e| e["id"] == event_id.as_str()).unwrap();

    assert_eq!(wednesday["current_signups"], 1);
    assert_eq!(wednesday["confirmed_players"][0]["name"], "Kathy Whitworth");
    assert_eq!(wednesday["confirmed_players"][0]["email"], "kathy@example.com");
}

#[tokio::test]
async fn test_rolling_events_advance_after_friday_rollover() {
    let app = TestApp::new();
    let before = app.event_id("2026-10-26").await;

    // Saturday 2026-10-24 09:00 Pacific
    app.clock
        .set(Utc.with_ymd_and_hms(2026, 10, 24, 17, 0, 0).unwrap());
    let (_, body) = app.call(get_request("/api/events/rolling")).await;

    assert_eq!(body["week1_start"], "2026-10-26");
    assert_eq!(body["week2_end"], "2026-11-08");
    let events = body["events"].as_array().unwrap();
    assert_eq!(events.len(), 6);
    // Sessions keep their identity across rollovers.
    assert_eq!(events[0]["id"], before.as_str());
}

#[tokio::test]
async fn test_rolling_events_are_idempotent() {
    let app = TestApp::new();

    let first = app.rolling_events().await;
    let second = app.rolling_events().await;

    let ids = |events: &[serde_json::Value]| -> Vec<String> {
        events
            .iter()
            .map(|e| e["id"].as_str().unwrap().to_string())
            .collect()
    };
    assert_eq!(ids(&first), ids(&second));
}

// =============================================================================
// GET /api/events/week/:offset Tests
// =============================================================================

#[tokio::test]
async fn test_week_events_current_and_next() {
    let app = TestApp::new();

    let (status, body) = app.call(get_request("/api/events/week/0")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["week_start"], "2026-10-19");
    assert_eq!(body["week_end"], "2026-10-25");
    assert_eq!(
        dates(body["events"].as_array().unwrap()),
        vec!["2026-10-21", "2026-10-23"]
    );

    let (status, body) = app.call(get_request("/api/events/week/1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["week_start"], "2026-10-26");
    assert_eq!(
        dates(body["events"].as_array().unwrap()),
        vec!["2026-10-26", "2026-10-28", "2026-10-30"]
    );
}

#[tokio::test]
async fn test_week_events_rejects_other_offsets() {
    let app = TestApp::new();

    let (status, body) = app.call(get_request("/api/events/week/2")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "Only weeks 0 and 1 are supported in rolling calendar"
    );
}

// =============================================================================
// POST /api/generate-weekly-events Tests
// =============================================================================

#[tokio::test]
async fn test_generate_weekly_events_reports_created() {
    let app = TestApp::new();

    let (status, body) = app
        .call(empty_request(Method::POST, "/api/generate-weekly-events"))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["events"], 5);
    assert_eq!(body["message"], "Created 5 events");

    let (status, body) = app
        .call(empty_request(Method::POST, "/api/generate-weekly-events"))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["events"], 0);
}

// =============================================================================
// GET /api/events/:event_id/roster Tests
// =============================================================================

#[tokio::test]
async fn test_roster_of_empty_session() {
    let app = TestApp::new();
    let event_id = app.event_id("2026-10-30").await;

    let roster = app.roster(&event_id).await;

    assert_eq!(roster["event"]["id"], event_id.as_str());
    assert_eq!(roster["event"]["day_of_week"], "Friday");
    assert_eq!(roster["total_signups"], 0);
    assert_eq!(roster["total_waitlist"], 0);
    assert_eq!(roster["total_cancelled"], 0);
}

#[tokio::test]
async fn test_roster_unknown_event() {
    let app = TestApp::new();

    let (status, body) = app
        .call(get_request(&format!(
            "/api/events/{}/roster",
            uuid::Uuid::new_v4()
        )))
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Event not found");
}
