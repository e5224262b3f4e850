use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

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
    pub storage: StorageConfig,
    pub model: ModelConfig,
    /// `None` when no alert recipient is configured; alerts are then reported as not sent.
    pub notification: Option<NotificationConfig>,
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

        let donor_csv = env::var("APP_DONOR_CSV").unwrap_or_else(|_| "donors.csv".to_string());
        let model_path = env::var("APP_MODEL_PATH")
            .unwrap_or_else(|_| "models/maternal_risk.json".to_string());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            storage: StorageConfig {
                donor_csv: PathBuf::from(donor_csv),
            },
            model: ModelConfig {
                path: PathBuf::from(model_path),
            },
            notification: NotificationConfig::from_env()?,
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

/// Location of the donor table.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub donor_csv: PathBuf,
}

/// Location of the pinned risk model artifact.
#[derive(Debug, Clone)]
pub struct ModelConfig {
    pub path: PathBuf,
}

/// Outbound mail relay settings for SOS alerts.
#[derive(Clone)]
pub struct NotificationConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub username: String,
    pub password: String,
    pub sender: String,
    pub recipient: String,
    pub timeout: Duration,
}

impl NotificationConfig {
    fn from_env() -> Result<Option<Self>, ConfigError> {
        let recipient = match env::var("APP_ALERT_RECIPIENT") {
            Ok(value) if !value.trim().is_empty() => value,
            _ => return Ok(None),
        };

        let smtp_host = env::var("APP_SMTP_HOST").unwrap_or_else(|_| "smtp.gmail.com".to_string());
        let smtp_port = env::var("APP_SMTP_PORT")
            .unwrap_or_else(|_| "587".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidSmtpPort)?;
        let timeout_secs = env::var("APP_SMTP_TIMEOUT_SECS")
            .unwrap_or_else(|_| "10".to_string())
            .parse::<u64>()
            .ok()
            .filter(|secs| *secs > 0)
            .ok_or(ConfigError::InvalidTimeout)?;

        Ok(Some(Self {
            smtp_host,
            smtp_port,
            username: required("APP_SMTP_USERNAME")?,
            password: required("APP_SMTP_PASSWORD")?,
            sender: required("APP_ALERT_SENDER")?,
            recipient,
            timeout: Duration::from_secs(timeout_secs),
        }))
    }
}

impl fmt::Debug for NotificationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotificationConfig")
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("sender", &self.sender)
            .field("recipient", &self.recipient)
            .field("timeout", &self.timeout)
            .finish()
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::MissingVar(name)),
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidSmtpPort,
    InvalidTimeout,
    MissingVar(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidSmtpPort => write!(f, "APP_SMTP_PORT must be a valid u16"),
            ConfigError::InvalidTimeout => {
                write!(f, "APP_SMTP_TIMEOUT_SECS must be a positive number of seconds")
            }
            ConfigError::MissingVar(name) => {
                write!(f, "{name} is required when APP_ALERT_RECIPIENT is set")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidSmtpPort
            | ConfigError::InvalidTimeout
            | ConfigError::MissingVar(_) => None,
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
        for name in [
            "APP_ENV",
            "APP_HOST",
            "APP_PORT",
            "APP_LOG_LEVEL",
            "APP_DONOR_CSV",
            "APP_MODEL_PATH",
            "APP_ALERT_RECIPIENT",
            "APP_ALERT_SENDER",
            "APP_SMTP_HOST",
            "APP_SMTP_PORT",
            "APP_SMTP_USERNAME",
            "APP_SMTP_PASSWORD",
            "APP_SMTP_TIMEOUT_SECS",
        ] {
            env::remove_var(name);
        }
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
        assert_eq!(config.storage.donor_csv, PathBuf::from("donors.csv"));
        assert_eq!(config.model.path, PathBuf::from("models/maternal_risk.json"));
        assert!(config.notification.is_none());
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
    }

    #[test]
    fn alert_recipient_requires_credentials() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_ALERT_RECIPIENT", "ward@example.org");
        env::set_var("APP_ALERT_SENDER", "alerts@example.org");

        match AppConfig::load() {
            Err(ConfigError::MissingVar("APP_SMTP_USERNAME")) => {}
            other => panic!("expected missing username, got {other:?}"),
        }
    }

    #[test]
    fn notification_settings_load_with_relay_defaults() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_ALERT_RECIPIENT", "ward@example.org");
        env::set_var("APP_ALERT_SENDER", "alerts@example.org");
        env::set_var("APP_SMTP_USERNAME", "relay-user");
        env::set_var("APP_SMTP_PASSWORD", "relay-secret");

        let config = AppConfig::load().expect("config loads");
        let notification = config.notification.expect("alerts enabled");
        assert_eq!(notification.smtp_host, "smtp.gmail.com");
        assert_eq!(notification.smtp_port, 587);
        assert_eq!(notification.timeout, Duration::from_secs(10));
        assert!(!format!("{notification:?}").contains("relay-secret"));
        reset_env();
    }

    #[test]
    fn rejects_zero_timeout() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_ALERT_RECIPIENT", "ward@example.org");
        env::set_var("APP_SMTP_TIMEOUT_SECS", "0");

        assert!(matches!(AppConfig::load(), Err(ConfigError::InvalidTimeout)));
        reset_env();
    }
}
