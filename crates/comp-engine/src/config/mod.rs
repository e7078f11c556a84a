use rust_decimal::Decimal;
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

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

/// Top-level configuration for the compensation service.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub compensation: CompensationConfig,
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

        let oversized_payout_multiple = match env::var("COMP_OVERSIZED_MULTIPLE") {
            Ok(raw) => parse_multiple(&raw)?,
            Err(_) => CompensationConfig::DEFAULT_OVERSIZED_MULTIPLE,
        };
        let seed_demo_data = match env::var("COMP_SEED_DEMO") {
            Ok(raw) => parse_flag(&raw)?,
            Err(_) => environment == AppEnvironment::Development,
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            compensation: CompensationConfig {
                oversized_payout_multiple,
                seed_demo_data,
            },
        })
    }
}

fn parse_multiple(raw: &str) -> Result<Decimal, ConfigError> {
    let value = Decimal::from_str(raw.trim())
        .map_err(|_| ConfigError::InvalidOversizedMultiple(raw.to_string()))?;
    if value <= Decimal::ZERO {
        return Err(ConfigError::InvalidOversizedMultiple(raw.to_string()));
    }
    Ok(value)
}

fn parse_flag(raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidFlag {
            name: "COMP_SEED_DEMO",
            value: raw.to_string(),
        }),
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

/// Engine-facing knobs that operators may tune per deployment.
#[derive(Debug, Clone, PartialEq)]
pub struct CompensationConfig {
    /// Raw bonus above `base_salary * multiple` raises an oversized-payout alert.
    pub oversized_payout_multiple: Decimal,
    /// Seed the in-memory store with sample employees and funds on startup.
    /// Defaults to on only in development.
    pub seed_demo_data: bool,
}

impl CompensationConfig {
    pub const DEFAULT_OVERSIZED_MULTIPLE: Decimal = Decimal::from_parts(3, 0, 0, false, 0);
}

impl Default for CompensationConfig {
    fn default() -> Self {
        Self {
            oversized_payout_multiple: Self::DEFAULT_OVERSIZED_MULTIPLE,
            seed_demo_data: true,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidOversizedMultiple(String),
    InvalidFlag { name: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidOversizedMultiple(value) => write!(
                f,
                "COMP_OVERSIZED_MULTIPLE must be a positive decimal, got '{}'",
                value
            ),
            ConfigError::InvalidFlag { name, value } => {
                write!(f, "{} must be true or false, got '{}'", name, value)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidOversizedMultiple(_)
            | ConfigError::InvalidFlag { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        env::remove_var("APP_ENV");
        env::remove_var("APP_HOST");
        env::remove_var("APP_PORT");
        env::remove_var("APP_LOG_LEVEL");
        env::remove_var("COMP_OVERSIZED_MULTIPLE");
        env::remove_var("COMP_SEED_DEMO");
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.compensation, CompensationConfig::default());
        assert_eq!(config.compensation.oversized_payout_multiple, Decimal::from(3));
    }

    #[test]
    fn reads_compensation_overrides() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("COMP_OVERSIZED_MULTIPLE", "2.5");
        env::set_var("COMP_SEED_DEMO", "off");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(
            config.compensation.oversized_payout_multiple,
            Decimal::new(25, 1)
        );
        assert!(!config.compensation.seed_demo_data);
        reset_env();
    }

    #[test]
    fn demo_seed_defaults_off_outside_development() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_ENV", "production");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.environment, AppEnvironment::Production);
        assert!(!config.compensation.seed_demo_data);

        env::set_var("COMP_SEED_DEMO", "on");
        let config = AppConfig::load().expect("config loads");
        assert!(config.compensation.seed_demo_data);
        reset_env();
    }

    #[test]
    fn rejects_non_positive_oversized_multiple() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("COMP_OVERSIZED_MULTIPLE", "-1");
        let err = AppConfig::load().expect_err("negative multiple rejected");
        assert!(matches!(err, ConfigError::InvalidOversizedMultiple(_)));
        reset_env();
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
        reset_env();
    }
}
