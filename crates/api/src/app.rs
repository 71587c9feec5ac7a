use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use domain::services::{
    Clock, EngineSettings, MemberStore, SessionStore, SignupEngine, SignupNotifier,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{metrics_handler, metrics_middleware, trace_id};
use crate::routes::{events, health, members, signups};

/// Which store implementation backs the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Memory,
    Postgres,
}

impl StoreBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreBackend::Memory => "memory",
            StoreBackend::Postgres => "postgres",
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub sessions: Arc<dyn SessionStore>,
    pub members: Arc<dyn MemberStore>,
    pub engine: Arc<SignupEngine>,
    pub clock: Arc<dyn Clock>,
    pub backend: StoreBackend,
}

/// Stores and collaborators the application is assembled from.
pub struct AppParts {
    pub sessions: Arc<dyn SessionStore>,
    pub members: Arc<dyn MemberStore>,
    pub notifier: Arc<dyn SignupNotifier>,
    pub clock: Arc<dyn Clock>,
    pub backend: StoreBackend,
}

impl AppState {
    pub fn new(config: Config, parts: AppParts) -> Self {
        let settings = EngineSettings {
            session_capacity: config.club.session_capacity,
            window_policy: config.window_policy(),
        };
        let engine = Arc::new(SignupEngine::new(
            parts.sessions.clone(),
            parts.notifier,
            settings,
        ));
        Self {
            config: Arc::new(config),
            sessions: parts.sessions,
            members: parts.members,
            engine,
            clock: parts.clock,
            backend: parts.backend,
        }
    }
}

pub fn create_app(state: AppState) -> Router {
    let config = state.config.clone();

    // Build CORS layer based on configuration
    let cors = if config.security.cors_origins.is_empty() {
        // Default: allow any origin (for development)
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    let golf_routes = Router::new()
        .route("/api/events/rolling", get(events::rolling_events))
        .route("/api/events/week/:offset", get(events::week_events))
        .route("/api/events/:event_id/roster", get(events::event_roster))
        .route(
            "/api/generate-weekly-events",
            post(events::generate_weekly_events),
        )
        .route("/api/signup", post(signups::sign_up))
        .route("/api/signup/:signup_id/cancel", post(signups::cancel_signup))
        .route("/api/user-signups/:email", get(signups::member_signups))
        .route(
            "/api/users",
            get(members::list_members).post(members::create_member),
        );

    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler));

    Router::new()
        .merge(public_routes)
        .merge(golf_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors)
        .with_state(state)
}
