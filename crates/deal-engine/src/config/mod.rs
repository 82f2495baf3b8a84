use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

use crate::analysis::finance::FinanceDefaults;

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

/// Top-level configuration for the deal analysis service.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub finance: FinanceDefaults,
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
            finance: load_finance_defaults()?,
        })
    }
}

fn load_finance_defaults() -> Result<FinanceDefaults, ConfigError> {
    let mut defaults = FinanceDefaults::default();

    if let Ok(raw) = env::var("APP_FINANCE_LTV") {
        defaults.ltv = parse_ratio("APP_FINANCE_LTV", &raw)?;
    }
    if let Ok(raw) = env::var("APP_FINANCE_POINTS_PCT") {
        defaults.points_pct = parse_ratio("APP_FINANCE_POINTS_PCT", &raw)?;
    }
    if let Ok(raw) = env::var("APP_FINANCE_INTEREST_PCT") {
        defaults.interest_pct = parse_ratio("APP_FINANCE_INTEREST_PCT", &raw)?;
    }
    if let Ok(raw) = env::var("APP_FINANCE_MONTHS_HELD") {
        defaults.months_held = raw
            .trim()
            .parse::<u32>()
            .map_err(|_| ConfigError::InvalidFinanceSetting {
                key: "APP_FINANCE_MONTHS_HELD",
            })?;
    }

    Ok(defaults)
}

// Lender ratios are fractions of 1, not percentages.
fn parse_ratio(key: &'static str, raw: &str) -> Result<f64, ConfigError> {
    let value = raw
        .trim()
        .parse::<f64>()
        .map_err(|_| ConfigError::InvalidFinanceSetting { key })?;
    if !(0.0..=1.0).contains(&value) {
        return Err(ConfigError::InvalidFinanceSetting { key });
    }
    Ok(value)
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

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidFinanceSetting { key: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidFinanceSetting { key } => {
                write!(f, "{key} must be a valid finance setting")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort => None,
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidFinanceSetting { .. } => None,
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
        env::remove_var("APP_FINANCE_LTV");
        env::remove_var("APP_FINANCE_POINTS_PCT");
        env::remove_var("APP_FINANCE_INTEREST_PCT");
        env::remove_var("APP_FINANCE_MONTHS_HELD");
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
        assert_eq!(config.finance, FinanceDefaults::default());
    }

    #[test]
    fn finance_defaults_override_from_env() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_FINANCE_LTV", "0.85");
        env::set_var("APP_FINANCE_MONTHS_HELD", "9");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.finance.ltv, 0.85);
        assert_eq!(config.finance.months_held, 9);
        assert_eq!(config.finance.points_pct, 0.02);
        reset_env();
    }

    #[test]
    fn rejects_ltv_above_one() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_FINANCE_LTV", "1.5");
        let result = AppConfig::load();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidFinanceSetting {
                key: "APP_FINANCE_LTV"
            })
        ));
        env::remove_var("APP_FINANCE_LTV");
    }

    #[test]
    fn rejects_non_numeric_port() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_PORT", "not-a-port");
        let result = AppConfig::load();
        assert!(matches!(result, Err(ConfigError::InvalidPort)));
        env::remove_var("APP_PORT");
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
        env::remove_var("APP_HOST");
    }
}
