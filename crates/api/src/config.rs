use domain::services::time_window::{
    WindowPolicy, DEFAULT_SIGNUP_OPEN_LEAD_HOURS, DEFAULT_UTC_OFFSET_MINUTES,
};
use serde::Deserialize;
use std::net::SocketAddr;

/// Largest accepted club UTC offset, in minutes.
const MAX_UTC_OFFSET_MINUTES: i32 = 14 * 60;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    #[serde(default)]
    pub security: SecurityConfig,
    #[serde(default)]
    pub club: ClubConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL URL; empty or `memory` keeps everything in process memory.
    #[serde(default)]
    pub url: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    #[serde(default = "default_min_connections")]
    pub min_connections: u32,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
}

impl DatabaseConfig {
    /// Returns true if no database is configured.
    pub fn is_memory(&self) -> bool {
        let url = self.url.trim();
        url.is_empty() || url.eq_ignore_ascii_case("memory")
    }
}

impl From<&DatabaseConfig> for persistence::db::DatabaseConfig {
    fn from(config: &DatabaseConfig) -> Self {
        Self {
            url: config.url.clone(),
            max_connections: config.max_connections,
            min_connections: config.min_connections,
            connect_timeout_secs: config.connect_timeout_secs,
            idle_timeout_secs: config.idle_timeout_secs,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SecurityConfig {
    /// Allowed CORS origins; empty allows any origin.
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

/// Club scheduling rules.
#[derive(Debug, Clone, Deserialize)]
pub struct ClubConfig {
    /// Players confirmed per session before sign-ups are waitlisted.
    #[serde(default = "default_session_capacity")]
    pub session_capacity: i32,

    /// Fixed offset of club-local time from UTC, in minutes (Pacific: -480).
    #[serde(default = "default_utc_offset_minutes")]
    pub utc_offset_minutes: i32,

    /// How long before the cutoff sign-ups open, in hours.
    #[serde(default = "default_signup_open_lead_hours")]
    pub signup_open_lead_hours: i64,
}

impl Default for ClubConfig {
    fn default() -> Self {
        Self {
            session_capacity: default_session_capacity(),
            utc_offset_minutes: default_utc_offset_minutes(),
            signup_open_lead_hours: default_signup_open_lead_hours(),
        }
    }
}

impl ClubConfig {
    /// Window policy for these settings, or `None` if they are out of range.
    pub fn window_policy(&self) -> Option<WindowPolicy> {
        if self.utc_offset_minutes.abs() > MAX_UTC_OFFSET_MINUTES {
            return None;
        }
        WindowPolicy::from_config(self.utc_offset_minutes, self.signup_open_lead_hours)
    }
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_request_timeout() -> u64 {
    30
}
fn default_max_connections() -> u32 {
    20
}
fn default_min_connections() -> u32 {
    5
}
fn default_connect_timeout() -> u64 {
    10
}
fn default_idle_timeout() -> u64 {
    600
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "json".to_string()
}
fn default_session_capacity() -> i32 {
    domain::models::session::DEFAULT_SESSION_CAPACITY
}
fn default_utc_offset_minutes() -> i32 {
    DEFAULT_UTC_OFFSET_MINUTES
}
fn default_signup_open_lead_hours() -> i64 {
    DEFAULT_SIGNUP_OPEN_LEAD_HOURS
}

/// Configuration validation error
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Missing required configuration: {0}")]
    MissingRequired(String),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Loading order (later sources override earlier):
    /// 1. config/default.toml - base configuration with defaults
    /// 2. config/local.toml - local overrides (optional, not in git)
    /// 3. Environment variables with GOLF__ prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(config::Environment::with_prefix("GOLF").separator("__"))
            .build()?;

        let cfg: Self = config.try_deserialize()?;
        cfg.validate()
            .map_err(|e| config::ConfigError::Message(e.to_string()))?;
        Ok(cfg)
    }

    /// Load configuration for testing with custom overrides.
    ///
    /// This method creates a config entirely from defaults and overrides,
    /// without relying on config files (which may not be accessible during tests).
    pub fn load_for_test(overrides: &[(&str, &str)]) -> Result<Self, config::ConfigError> {
        // Embed defaults directly to avoid file system dependency in tests
        let defaults = r#"
            [server]
            host = "127.0.0.1"
            port = 8080
            request_timeout_secs = 30

            [database]
            url = "memory"
            max_connections = 20
            min_connections = 5
            connect_timeout_secs = 10
            idle_timeout_secs = 600

            [logging]
            level = "info"
            format = "json"

            [security]
            cors_origins = []

            [club]
            session_capacity = 16
            utc_offset_minutes = -480
            signup_open_lead_hours = 120
        "#;

        let mut builder = config::Config::builder()
            .add_source(config::File::from_str(defaults, config::FileFormat::Toml));

        for (key, value) in overrides {
            builder = builder.set_override(*key, *value)?;
        }

        let cfg: Self = builder.build()?.try_deserialize()?;
        // Skip validation in tests to allow partial configs
        Ok(cfg)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        // Validate port range
        if self.server.port == 0 {
            return Err(ConfigValidationError::InvalidValue(
                "Server port cannot be 0".to_string(),
            ));
        }

        // Validate connection pool settings
        if !self.database.is_memory() && self.database.min_connections > self.database.max_connections {
            return Err(ConfigValidationError::InvalidValue(
                "min_connections cannot exceed max_connections".to_string(),
            ));
        }

        if self.club.session_capacity <= 0 {
            return Err(ConfigValidationError::InvalidValue(
                "club.session_capacity must be positive".to_string(),
            ));
        }

        if self.club.window_policy().is_none() {
            return Err(ConfigValidationError::InvalidValue(format!(
                "club.utc_offset_minutes must be within ±{} and club.signup_open_lead_hours non-negative",
                MAX_UTC_OFFSET_MINUTES
            )));
        }

        Ok(())
    }

    /// Window policy from the club section; falls back to the defaults for
    /// unvalidated configs.
    pub fn window_policy(&self) -> WindowPolicy {
        self.club.window_policy().unwrap_or_default()
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.server.host, self.server.port).parse()
    }
}
