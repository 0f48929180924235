use domain::services::{AggregationOptions, OverallWeighting, ProrationMode};
use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

pub use persistence::db::DatabaseConfig;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub security: SecurityConfig,
    /// JWT validation keys
    pub jwt: JwtAuthConfig,
    #[serde(default)]
    pub limits: LimitsConfig,
    #[serde(default)]
    pub calendar: CalendarConfig,
    #[serde(default)]
    pub performance: PerformanceConfig,
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
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SecurityConfig {
    #[serde(default)]
    pub cors_origins: Vec<String>,

    /// Requests per minute per employee; 0 disables rate limiting.
    #[serde(default = "default_rate_limit")]
    pub rate_limit_per_minute: u32,

    /// Adds `Strict-Transport-Security`; enable only behind TLS.
    #[serde(default)]
    pub hsts_enabled: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JwtAuthConfig {
    /// RSA private key in PEM format. Only needed where tokens are issued.
    #[serde(default)]
    pub private_key: String,

    /// RSA public key in PEM format used to verify access tokens.
    pub public_key: String,

    #[serde(default = "default_access_token_expiry")]
    pub access_token_expiry_secs: i64,

    #[serde(default = "default_jwt_leeway")]
    pub leeway_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    #[serde(default = "default_max_bulk_employees")]
    pub max_bulk_employees: usize,

    #[serde(default = "default_max_page_size")]
    pub max_page_size: i64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_bulk_employees: default_max_bulk_employees(),
            max_page_size: default_max_page_size(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CalendarConfig {
    /// ISO weekday numbers, 1 = Monday .. 7 = Sunday.
    #[serde(default = "default_working_days")]
    pub working_days_of_week: Vec<u32>,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            working_days_of_week: default_working_days(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PerformanceConfig {
    #[serde(default)]
    pub proration: ProrationMode,

    #[serde(default)]
    pub overall_weighting: OverallWeighting,
}

impl PerformanceConfig {
    pub fn aggregation_options(&self) -> AggregationOptions {
        AggregationOptions {
            proration: self.proration,
            weighting: self.overall_weighting,
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_request_timeout() -> u64 {
    30
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "json".to_string()
}
fn default_rate_limit() -> u32 {
    120
}
fn default_access_token_expiry() -> i64 {
    3600
}
fn default_jwt_leeway() -> u64 {
    30
}
fn default_max_bulk_employees() -> usize {
    500
}
fn default_max_page_size() -> i64 {
    100
}
fn default_working_days() -> Vec<u32> {
    vec![1, 2, 3, 4, 5]
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
    /// 3. Environment variables with HR__ prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("HR")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("security.cors_origins")
                    .with_list_parse_key("calendar.working_days_of_week")
                    .try_parsing(true),
            )
            .build()?;

        let cfg: Self = config.try_deserialize()?;
        cfg.validate()
            .map_err(|e| config::ConfigError::Message(e.to_string()))?;
        Ok(cfg)
    }

    /// Load configuration for testing with custom overrides.
    ///
    /// Builds the config from embedded defaults so tests do not depend on files.
    #[cfg(test)]
    pub fn load_for_test(overrides: &[(&str, &str)]) -> Result<Self, config::ConfigError> {
        let defaults = r#"
            [server]
            host = "0.0.0.0"
            port = 8080
            request_timeout_secs = 30

            [database]
            url = ""
            max_connections = 20
            min_connections = 5
            connect_timeout_secs = 10
            idle_timeout_secs = 600

            [logging]
            level = "info"
            format = "json"

            [security]
            cors_origins = []
            rate_limit_per_minute = 120

            [jwt]
            public_key = "test-public-key"
            access_token_expiry_secs = 3600
            leeway_secs = 30

            [limits]
            max_bulk_employees = 500
            max_page_size = 100

            [calendar]
            working_days_of_week = [1, 2, 3, 4, 5]

            [performance]
            proration = "working_days"
            overall_weighting = "unweighted"
        "#;

        let mut builder = config::Config::builder()
            .add_source(config::File::from_str(defaults, config::FileFormat::Toml));

        for (key, value) in overrides {
            builder = builder.set_override(*key, *value)?;
        }

        builder.build()?.try_deserialize()
    }

    /// Validate configuration values.
    fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.database.url.is_empty() {
            return Err(ConfigValidationError::MissingRequired(
                "HR__DATABASE__URL environment variable must be set".to_string(),
            ));
        }

        if self.jwt.public_key.is_empty() {
            return Err(ConfigValidationError::MissingRequired(
                "HR__JWT__PUBLIC_KEY environment variable must be set".to_string(),
            ));
        }

        if self.server.port == 0 {
            return Err(ConfigValidationError::InvalidValue(
                "Server port cannot be 0".to_string(),
            ));
        }

        if self.database.min_connections > self.database.max_connections {
            return Err(ConfigValidationError::InvalidValue(
                "min_connections cannot exceed max_connections".to_string(),
            ));
        }

        if let Some(day) = self
            .calendar
            .working_days_of_week
            .iter()
            .find(|d| !(1..=7).contains(*d))
        {
            return Err(ConfigValidationError::InvalidValue(format!(
                "working_days_of_week entries must be 1-7, got {}",
                day
            )));
        }

        if self.limits.max_page_size < 1 || self.limits.max_bulk_employees < 1 {
            return Err(ConfigValidationError::InvalidValue(
                "limits must be positive".to_string(),
            ));
        }

        Ok(())
    }

    /// Address to bind. Falls back to all interfaces if `host` is not an IP.
    pub fn socket_addr(&self) -> SocketAddr {
        let ip = self
            .server
            .host
            .parse::<IpAddr>()
            .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED));
        SocketAddr::new(ip, self.server.port)
    }
}
