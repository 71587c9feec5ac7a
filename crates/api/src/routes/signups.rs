//! Sign-up and cancellation routes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use domain::errors::SignupError;
use domain::models::signup::{
    CancelResponse, MemberSignup, MemberSignupsResponse, SignupRequest, SignupResponse,
};
use domain::models::{Participant, SessionSummary, SignupStatus};
use shared::validation::{non_blank_name, normalize_email, normalize_name};
use std::collections::HashMap;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::metrics::{record_cancellation, record_signup, record_signup_rejected};

/// Counts business-rule rejections before handing the error on.
fn rejected(err: SignupError) -> ApiError {
    if matches!(
        err,
        SignupError::SignupClosed { .. }
            | SignupError::CancellationClosed { .. }
            | SignupError::DuplicateSignup
    ) {
        record_signup_rejected(err.code());
    }
    err.into()
}

/// Sign up for a session, optionally for a guest.
///
/// POST /api/signup
///
/// The member is looked up by email and created on first sign-up, but only
/// after the event is known to accept sign-ups. With `guest_name`, the
/// sign-up holds a place for that guest under the member.
pub async fn sign_up(
    State(state): State<AppState>,
    Json(request): Json<SignupRequest>,
) -> Result<(StatusCode, Json<SignupResponse>), ApiError> {
    request.validate()?;

    let now = state.clock.now();
    let session = state
        .engine
        .open_session(request.event_id, now)
        .await
        .map_err(rejected)?;

    let email = normalize_email(&request.email);
    let name = normalize_name(&request.name);
    let (member, _) = state.members.find_or_create(&name, &email).await?;

    let guest_name = non_blank_name(request.guest_name.as_deref());
    let participant = match &guest_name {
        Some(guest) => Participant::guest(guest.clone(), member.to_ref()),
        None => Participant::member(member.to_ref()),
    };

    let signup = state
        .engine
        .sign_up(request.event_id, participant, now)
        .await
        .map_err(rejected)?;
    record_signup(signup.status);

    let guest_info = guest_name
        .map(|g| format!(" with guest {}", g))
        .unwrap_or_default();
    let message = match signup.status {
        SignupStatus::Waitlisted => format!(
            "Added to the waitlist for {}, {}{}",
            session.day_of_week(),
            session.date,
            guest_info
        ),
        _ => format!(
            "Successfully signed up for {}, {}{}",
            session.day_of_week(),
            session.date,
            guest_info
        ),
    };

    info!(
        signup_id = %signup.id,
        event_id = %request.event_id,
        member_id = %member.id,
        status = %signup.status,
        "Signup created"
    );

    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            message,
            status: signup.status,
            signup_id: signup.id,
        }),
    ))
}

/// Cancel a sign-up.
///
/// POST /api/signup/:signup_id/cancel
///
/// Freeing a confirmed place promotes the earliest waitlisted sign-up.
pub async fn cancel_signup(
    State(state): State<AppState>,
    Path(signup_id): Path<Uuid>,
) -> Result<Json<CancelResponse>, ApiError> {
    let outcome = state
        .engine
        .cancel(signup_id, state.clock.now())
        .await
        .map_err(rejected)?;

    let promoted_signup_id = outcome.promoted.as_ref().map(|s| s.id);
    record_cancellation(promoted_signup_id.is_some());

    info!(
        signup_id = %signup_id,
        promoted_signup_id = ?promoted_signup_id,
        "Signup cancelled"
    );

    Ok(Json(CancelResponse {
        message: "Signup cancelled successfully".to_string(),
        status: outcome.cancelled.status,
        promoted_signup_id,
    }))
}

/// Active sign-ups registered by a member.
///
/// GET /api/user-signups/:email
///
/// Unknown emails yield an empty list.
pub async fn member_signups(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<MemberSignupsResponse>, ApiError> {
    let email = normalize_email(&email);
    let signups = state.sessions.active_signups_for_member(&email).await?;
    let now = state.clock.now();

    let mut summaries: HashMap<Uuid, SessionSummary> = HashMap::new();
    let mut result = Vec::with_capacity(signups.len());

    for signup in signups {
        let event = match summaries.get(&signup.session_id) {
            Some(summary) => summary.clone(),
            None => {
                let Some(session) = state.sessions.find_session(signup.session_id).await? else {
                    continue;
                };
                let roster = state.sessions.load_roster(&session).await?;
                let summary = SessionSummary::new(&session, roster.counts(), now);
                summaries.insert(session.id, summary.clone());
                summary
            }
        };

        result.push(MemberSignup {
            id: signup.id,
            event_id: signup.session_id,
            status: signup.status,
            guest_name: signup.participant.guest_name().map(str::to_string),
            signup_date: signup.created_at,
            event,
        });
    }

    Ok(Json(MemberSignupsResponse { signups: result }))
}
