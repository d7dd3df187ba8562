use crate::workflows::remediation::RemediationEngine;
use crate::workflows::transcript::policy::GradingPolicy;
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub engine: EngineConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            engine: EngineConfig::from_env()?,
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Engine switch and the grading thresholds it plans against.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub enabled: bool,
    pub policy: GradingPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            policy: GradingPolicy::standard(),
        }
    }
}

impl EngineConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(value) = env::var("GRADES_ENGINE_ENABLED") {
            config.enabled = parse_flag("GRADES_ENGINE_ENABLED", &value)?;
        }
        if let Ok(value) = env::var("GRADES_PASS_THRESHOLD") {
            config.policy.pass_threshold =
                parse_grade_setting("GRADES_PASS_THRESHOLD", &value, config.policy.max_grade)?;
        }
        if let Ok(value) = env::var("GRADES_ELEMENT_FLOOR") {
            config.policy.element_floor = parse_grade_setting(
                "GRADES_ELEMENT_FLOOR",
                &value,
                config.policy.pass_threshold,
            )?;
        }

        Ok(config)
    }

    /// The engine to run, or `None` when remediation is switched off.
    pub fn engine(&self) -> Option<RemediationEngine> {
        self.enabled
            .then(|| RemediationEngine::new(self.policy.clone()))
    }
}

fn parse_flag(name: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidFlag {
            name,
            value: value.to_string(),
        }),
    }
}

/// Parses a grade in `0..=upper`.
fn parse_grade_setting(name: &'static str, value: &str, upper: f64) -> Result<f64, ConfigError> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|grade| grade.is_finite() && (0.0..=upper).contains(grade))
        .ok_or_else(|| ConfigError::InvalidGrade {
            name,
            value: value.to_string(),
            upper,
        })
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidFlag { name: &'static str, value: String },
    InvalidGrade {
        name: &'static str,
        value: String,
        upper: f64,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidFlag { name, value } => {
                write!(f, "{name} must be true/false, got '{value}'")
            }
            ConfigError::InvalidGrade { name, value, upper } => {
                write!(f, "{name} must be a grade between 0 and {upper}, got '{value}'")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidFlag { .. }
            | ConfigError::InvalidGrade { .. } => None,
        }
    }
}
