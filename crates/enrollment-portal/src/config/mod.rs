use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use crate::enrollment::eligibility::{EligibilityConfig, DEFAULT_MAX_COURSES_PER_SEMESTER};

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
    pub portal: PortalConfig,
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
            portal: PortalConfig::from_env()?,
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

/// Where portal data comes from and the enrollment cap applied when a student record carries
/// no override.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortalConfig {
    pub snapshot_path: Option<PathBuf>,
    pub max_courses_per_semester: u32,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            snapshot_path: None,
            max_courses_per_semester: DEFAULT_MAX_COURSES_PER_SEMESTER,
        }
    }
}

impl PortalConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let snapshot_path = env::var("PORTAL_SNAPSHOT_PATH")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);

        let max_courses_per_semester = match env::var("PORTAL_MAX_COURSES_PER_SEMESTER") {
            Ok(value) => {
                let parsed = value.trim().parse::<u32>().ok().filter(|limit| *limit > 0);
                parsed.ok_or(ConfigError::InvalidMaxCourses { value })?
            }
            Err(_) => DEFAULT_MAX_COURSES_PER_SEMESTER,
        };

        Ok(Self {
            snapshot_path,
            max_courses_per_semester,
        })
    }

    pub fn eligibility(&self) -> EligibilityConfig {
        EligibilityConfig {
            default_max_courses_per_semester: self.max_courses_per_semester,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidMaxCourses { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidMaxCourses { value } => write!(
                f,
                "PORTAL_MAX_COURSES_PER_SEMESTER must be a positive integer, got '{value}'"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidMaxCourses { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}
