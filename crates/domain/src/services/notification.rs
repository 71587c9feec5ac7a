//! Sign-up event notifications.
//!
//! The engine reports every applied change to a [`SignupNotifier`]. Delivering
//! anything to members (email, push) is left to notifier implementations
//! outside this crate; [`LogNotifier`] only writes structured log lines.

use chrono::NaiveDate;
use serde::Serialize;
use std::sync::Mutex;

use crate::models::Signup;

/// Notification type enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SignupEventKind {
    Registered,
    Cancelled,
    Promoted,
}

impl std::fmt::Display for SignupEventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SignupEventKind::Registered => write!(f, "registered"),
            SignupEventKind::Cancelled => write!(f, "cancelled"),
            SignupEventKind::Promoted => write!(f, "promoted"),
        }
    }
}

/// A change applied to a session roster.
#[derive(Debug, Clone, Serialize)]
pub struct SignupEvent {
    pub kind: SignupEventKind,
    pub session_date: NaiveDate,
    pub signup: Signup,
}

impl SignupEvent {
    pub fn new(kind: SignupEventKind, session_date: NaiveDate, signup: Signup) -> Self {
        Self {
            kind,
            session_date,
            signup,
        }
    }
}

#[async_trait::async_trait]
pub trait SignupNotifier: Send + Sync {
    async fn notify(&self, event: &SignupEvent);
}

/// Notifier that records events in the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

#[async_trait::async_trait]
impl SignupNotifier for LogNotifier {
    async fn notify(&self, event: &SignupEvent) {
        let registrant = event.signup.participant.registrant();
        tracing::info!(
            kind = %event.kind,
            session_date = %event.session_date,
            signup_id = %event.signup.id,
            status = %event.signup.status,
            email = %registrant.email,
            guest = event.signup.participant.guest_name().unwrap_or(""),
            "Signup event"
        );
    }
}

/// Notifier that keeps events in memory, for tests.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    events: Mutex<Vec<SignupEvent>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<SignupEvent> {
        self.events.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn kinds(&self) -> Vec<SignupEventKind> {
        self.events().into_iter().map(|e| e.kind).collect()
    }
}

#[async_trait::async_trait]
impl SignupNotifier for RecordingNotifier {
    async fn notify(&self, event: &SignupEvent) {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MemberRef, Participant, SignupStatus};
    use chrono::Utc;
    use uuid::Uuid;

    fn signup() -> Signup {
        Signup::new(
            Uuid::new_v4(),
            Participant::member(MemberRef {
                id: Uuid::new_v4(),
                name: "Lee".into(),
                email: "lee@example.com".into(),
            }),
            SignupStatus::Confirmed,
            Utc::now(),
        )
    }

    #[test]
    fn test_event_kind_display() {
        assert_eq!(SignupEventKind::Registered.to_string(), "registered");
        assert_eq!(SignupEventKind::Promoted.to_string(), "promoted");
    }

    #[tokio::test]
    async fn test_recording_notifier_keeps_order() {
        let notifier = RecordingNotifier::new();
        let date = NaiveDate::from_ymd_opt(2026, 10, 26).unwrap();
        notifier
            .notify(&SignupEvent::new(SignupEventKind::Cancelled, date, signup()))
            .await;
        notifier
            .notify(&SignupEvent::new(SignupEventKind::Promoted, date, signup()))
            .await;
        assert_eq!(
            notifier.kinds(),
            vec![SignupEventKind::Cancelled, SignupEventKind::Promoted]
        );
    }

    #[tokio::test]
    async fn test_log_notifier_does_not_panic() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 26).unwrap();
        LogNotifier
            .notify(&SignupEvent::new(SignupEventKind::Registered, date, signup()))
            .await;
    }
}
