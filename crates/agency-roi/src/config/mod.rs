use chrono::NaiveDate;
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
    pub reporting: ReportingConfig,
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

        let default_month_span = match env::var("APP_DEFAULT_MONTH_SPAN") {
            Ok(raw) => raw
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|span| *span >= 1)
                .ok_or(ConfigError::InvalidMonthSpan)?,
            Err(_) => ReportingConfig::DEFAULT_MONTH_SPAN,
        };

        let analysis_window_end = match env::var("APP_ANALYSIS_WINDOW_END") {
            Ok(raw) => Some(
                NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
                    .map_err(|_| ConfigError::InvalidAnalysisWindowEnd)?,
            ),
            Err(_) => None,
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            reporting: ReportingConfig {
                default_month_span,
                analysis_window_end,
            },
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

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Reporting-window knobs that the aggregators take from the caller rather
/// than baking in as literals.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportingConfig {
    /// Month count used to scale monthly spend when the active window is
    /// open on either side. The reference analysis ran Jan through Sep,
    /// hence the default of 9.
    pub default_month_span: u32,
    /// Optional hard cutoff for the analysis window; the effective end
    /// bound never passes this date when it is set.
    pub analysis_window_end: Option<NaiveDate>,
}

impl ReportingConfig {
    pub const DEFAULT_MONTH_SPAN: u32 = 9;
}

impl Default for ReportingConfig {
    fn default() -> Self {
        Self {
            default_month_span: Self::DEFAULT_MONTH_SPAN,
            analysis_window_end: None,
        }
    }
}

impl ReportingConfig {
    /// Clamps the requested end bound to the configured analysis cutoff.
    pub fn effective_end(&self, end: Option<NaiveDate>) -> Option<NaiveDate> {
        match (end, self.analysis_window_end) {
            (Some(end), Some(cutoff)) => Some(end.min(cutoff)),
            (Some(end), None) => Some(end),
            (None, cutoff) => cutoff,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidMonthSpan,
    InvalidAnalysisWindowEnd,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidMonthSpan => {
                write!(f, "APP_DEFAULT_MONTH_SPAN must be an integer >= 1")
            }
            ConfigError::InvalidAnalysisWindowEnd => {
                write!(f, "APP_ANALYSIS_WINDOW_END must be a YYYY-MM-DD date")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            _ => None,
        }
    }
}
