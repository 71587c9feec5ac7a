//! Calendar and roster routes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use domain::models::session::{
    GenerateEventsResponse, RollingEventsResponse, SessionWithRoster, WeekEventsResponse,
};
use domain::models::signup::{PlayerEntry, RosterResponse};
use domain::models::{Session, SessionSummary};
use tracing::info;
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::metrics::record_sessions_created;

/// Summary plus confirmed and waitlisted players of each session.
async fn with_rosters(
    state: &AppState,
    sessions: &[Session],
    now: DateTime<Utc>,
) -> Result<Vec<SessionWithRoster>, ApiError> {
    let mut events = Vec::with_capacity(sessions.len());
    for session in sessions {
        let roster = state.sessions.load_roster(session).await?;
        let view = roster.roster_view();
        events.push(SessionWithRoster {
            summary: SessionSummary::new(session, roster.counts(), now),
            confirmed_players: view.confirmed.iter().map(PlayerEntry::from).collect(),
            waitlist_players: view.waitlisted.iter().map(PlayerEntry::from).collect(),
        });
    }
    Ok(events)
}

/// Rolling two-week calendar.
///
/// GET /api/events/rolling
///
/// Creates any missing sessions on or after today before listing them.
pub async fn rolling_events(
    State(state): State<AppState>,
) -> Result<Json<RollingEventsResponse>, ApiError> {
    let now = state.clock.now();
    let schedule = state.engine.rolling_schedule(now).await?;
    record_sessions_created(schedule.created);

    let events = with_rosters(&state, &schedule.sessions, now).await?;
    let (week1, week2) = (schedule.weeks.week1(), schedule.weeks.week2());

    Ok(Json(RollingEventsResponse {
        events,
        week1_start: week1.start,
        week1_end: week1.end,
        week2_start: week2.start,
        week2_end: week2.end,
    }))
}

/// One week of the rolling calendar.
///
/// GET /api/events/week/:offset
///
/// Offset 0 is the current week, 1 the next one.
pub async fn week_events(
    State(state): State<AppState>,
    Path(offset): Path<u32>,
) -> Result<Json<WeekEventsResponse>, ApiError> {
    let now = state.clock.now();
    let schedule = state.engine.rolling_schedule(now).await?;
    record_sessions_created(schedule.created);

    let week = schedule.weeks.week(offset).ok_or_else(|| {
        ApiError::validation("Only weeks 0 and 1 are supported in rolling calendar")
    })?;

    let sessions = state.sessions.sessions_between(week.start, week.end).await?;
    let events = with_rosters(&state, &sessions, now).await?;

    Ok(Json(WeekEventsResponse {
        events,
        week_start: week.start,
        week_end: week.end,
    }))
}

/// Materialize the rolling window's sessions.
///
/// POST /api/generate-weekly-events
pub async fn generate_weekly_events(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<GenerateEventsResponse>), ApiError> {
    let schedule = state.engine.rolling_schedule(state.clock.now()).await?;
    record_sessions_created(schedule.created);

    info!(created = schedule.created, "Weekly events generated");

    Ok((
        StatusCode::CREATED,
        Json(GenerateEventsResponse {
            message: format!("Created {} events", schedule.created),
            events: schedule.created,
        }),
    ))
}

/// Full roster of one session, including cancellations.
///
/// GET /api/events/:event_id/roster
pub async fn event_roster(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
) -> Result<Json<RosterResponse>, ApiError> {
    let (session, roster) = state.engine.roster(event_id).await?;
    let view = roster.roster_view();
    let cancelled = roster.cancelled();

    let confirmed_players: Vec<PlayerEntry> = view.confirmed.iter().map(PlayerEntry::from).collect();
    let waitlist_players: Vec<PlayerEntry> = view.waitlisted.iter().map(PlayerEntry::from).collect();
    let cancelled_players: Vec<PlayerEntry> = cancelled.iter().map(PlayerEntry::from).collect();

    Ok(Json(RosterResponse {
        event: SessionSummary::new(&session, roster.counts(), state.clock.now()),
        total_signups: confirmed_players.len(),
        total_waitlist: waitlist_players.len(),
        total_cancelled: cancelled_players.len(),
        confirmed_players,
        waitlist_players,
        cancelled_players,
    }))
}
