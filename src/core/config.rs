use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::env;

/// Receive window applied to signed requests unless configured otherwise.
pub const DEFAULT_RECV_WINDOW_MS: i64 = 5000;

/// Request timeout applied to REST calls unless configured otherwise.
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

#[derive(Debug, Clone)]
pub struct ExchangeConfig {
    pub api_key: Secret<String>,
    pub secret_key: Secret<String>,
    pub testnet: bool,
    pub base_url: Option<String>,
    pub ws_url: Option<String>,
    /// Tolerated staleness of a signed request, in milliseconds.
    pub recv_window: i64,
    pub timeout_seconds: u64,
}

// Custom Serialize implementation - never expose secrets in serialization
impl Serialize for ExchangeConfig {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("ExchangeConfig", 7)?;
        state.serialize_field("api_key", "[REDACTED]")?;
        state.serialize_field("secret_key", "[REDACTED]")?;
        state.serialize_field("testnet", &self.testnet)?;
        state.serialize_field("base_url", &self.base_url)?;
        state.serialize_field("ws_url", &self.ws_url)?;
        state.serialize_field("recv_window", &self.recv_window)?;
        state.serialize_field("timeout_seconds", &self.timeout_seconds)?;
        state.end()
    }
}

impl<'de> Deserialize<'de> for ExchangeConfig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct ExchangeConfigHelper {
            api_key: String,
            secret_key: String,
            #[serde(default)]
            testnet: bool,
            base_url: Option<String>,
            ws_url: Option<String>,
            recv_window: Option<i64>,
            timeout_seconds: Option<u64>,
        }

        let helper = ExchangeConfigHelper::deserialize(deserializer)?;
        Ok(Self {
            api_key: Secret::new(helper.api_key),
            secret_key: Secret::new(helper.secret_key),
            testnet: helper.testnet,
            base_url: helper.base_url,
            ws_url: helper.ws_url,
            recv_window: helper.recv_window.unwrap_or(DEFAULT_RECV_WINDOW_MS),
            timeout_seconds: helper.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS),
        })
    }
}

impl ExchangeConfig {
    /// Create a new configuration with API credentials
    #[must_use]
    pub fn new(api_key: String, secret_key: String) -> Self {
        Self {
            api_key: Secret::new(api_key),
            secret_key: Secret::new(secret_key),
            testnet: false,
            base_url: None,
            ws_url: None,
            recv_window: DEFAULT_RECV_WINDOW_MS,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
        }
    }

    /// Create configuration from environment variables
    ///
    /// Expected environment variables:
    /// - `{PREFIX}_API_KEY` (e.g., `BINANCE_API_KEY`)
    /// - `{PREFIX}_SECRET_KEY` (e.g., `BINANCE_SECRET_KEY`)
    /// - `{PREFIX}_TESTNET` (optional, defaults to false)
    /// - `{PREFIX}_BASE_URL` (optional)
    /// - `{PREFIX}_WS_URL` (optional)
    /// - `{PREFIX}_RECV_WINDOW` (optional, milliseconds)
    pub fn from_env(exchange_prefix: &str) -> Result<Self, ConfigError> {
        let prefix = exchange_prefix.to_uppercase();
        let api_key_var = format!("{}_API_KEY", prefix);
        let secret_key_var = format!("{}_SECRET_KEY", prefix);

        let api_key = env::var(&api_key_var)
            .map_err(|_| ConfigError::MissingEnvironmentVariable(api_key_var))?;

        let secret_key = env::var(&secret_key_var)
            .map_err(|_| ConfigError::MissingEnvironmentVariable(secret_key_var))?;

        let testnet = env::var(format!("{}_TESTNET", prefix))
            .unwrap_or_else(|_| "false".to_string())
            .parse::<bool>()
            .unwrap_or(false);

        let recv_window = match env::var(format!("{}_RECV_WINDOW", prefix)) {
            Ok(raw) => raw.trim().parse::<i64>().map_err(|e| {
                ConfigError::InvalidConfiguration(format!(
                    "{}_RECV_WINDOW is not an integer: {}",
                    prefix, e
                ))
            })?,
            Err(_) => DEFAULT_RECV_WINDOW_MS,
        };

        Ok(Self {
            api_key: Secret::new(api_key),
            secret_key: Secret::new(secret_key),
            testnet,
            base_url: env::var(format!("{}_BASE_URL", prefix)).ok(),
            ws_url: env::var(format!("{}_WS_URL", prefix)).ok(),
            recv_window,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
        })
    }

    /// Create configuration from .env file and environment variables
    ///
    /// **Security Warning**: Never commit .env files to version control!
    #[cfg(feature = "env-file")]
    pub fn from_env_file(exchange_prefix: &str) -> Result<Self, ConfigError> {
        Self::from_env_file_with_path(exchange_prefix, ".env")
    }

    /// Create configuration from a specific .env file path
    ///
    /// A missing file is not an error; the system environment is used as is.
    #[cfg(feature = "env-file")]
    pub fn from_env_file_with_path(
        exchange_prefix: &str,
        env_file_path: &str,
    ) -> Result<Self, ConfigError> {
        match dotenv::from_path(env_file_path) {
            Ok(()) => {}
            Err(dotenv::Error::Io(io_err)) if io_err.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(ConfigError::InvalidConfiguration(format!(
                    "Failed to load .env file '{}': {}",
                    env_file_path, e
                )));
            }
        }

        Self::from_env(exchange_prefix)
    }

    /// Create configuration for read-only operations (market data only)
    /// This doesn't require API credentials for public endpoints
    #[must_use]
    pub fn read_only() -> Self {
        Self::new(String::new(), String::new())
    }

    /// Check if this configuration has valid credentials for authenticated operations
    #[must_use]
    pub fn has_credentials(&self) -> bool {
        !self.api_key.expose_secret().is_empty() && !self.secret_key.expose_secret().is_empty()
    }

    /// Set testnet mode
    #[must_use]
    pub const fn testnet(mut self, testnet: bool) -> Self {
        self.testnet = testnet;
        self
    }

    /// Set custom REST base URL
    #[must_use]
    pub fn base_url(mut self, base_url: String) -> Self {
        self.base_url = Some(base_url);
        self
    }

    /// Set custom stream base URL
    #[must_use]
    pub fn ws_url(mut self, ws_url: String) -> Self {
        self.ws_url = Some(ws_url);
        self
    }

    /// Set the receive window in milliseconds
    #[must_use]
    pub const fn recv_window(mut self, recv_window: i64) -> Self {
        self.recv_window = recv_window;
        self
    }

    /// Set the REST request timeout
    #[must_use]
    pub const fn timeout_seconds(mut self, timeout_seconds: u64) -> Self {
        self.timeout_seconds = timeout_seconds;
        self
    }

    /// Reject settings the exchange would never accept
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.recv_window <= 0 {
            return Err(ConfigError::InvalidConfiguration(format!(
                "receive window must be positive, got {}",
                self.recv_window
            )));
        }
        if self.timeout_seconds == 0 {
            return Err(ConfigError::InvalidConfiguration(
                "request timeout must be at least one second".to_string(),
            ));
        }
        Ok(())
    }

    /// Get API key (use carefully - exposes secret)
    pub fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }

    /// Get secret key (use carefully - exposes secret)
    pub fn secret_key(&self) -> &str {
        self.secret_key.expose_secret()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvironmentVariable(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_recv_window() {
        let config = ExchangeConfig::new("key".to_string(), "secret".to_string());
        assert_eq!(config.recv_window, 5000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_non_positive_recv_window_rejected() {
        for window in [0, -1, -5000] {
            let config = ExchangeConfig::read_only().recv_window(window);
            assert!(matches!(
                config.validate(),
                Err(ConfigError::InvalidConfiguration(_))
            ));
        }
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let config = ExchangeConfig::read_only().timeout_seconds(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_serialization_redacts_secrets() {
        let config = ExchangeConfig::new("my-key".to_string(), "my-secret".to_string());
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("my-key"));
        assert!(!json.contains("my-secret"));
        assert!(json.contains("[REDACTED]"));
    }

    #[test]
    fn test_deserialize_fills_defaults() {
        let config: ExchangeConfig =
            serde_json::from_str(r#"{"api_key":"k","secret_key":"s"}"#).unwrap();
        assert_eq!(config.recv_window, DEFAULT_RECV_WINDOW_MS);
        assert_eq!(config.timeout_seconds, DEFAULT_TIMEOUT_SECONDS);
        assert!(!config.testnet);
        assert!(config.has_credentials());
    }

    #[test]
    fn test_read_only_has_no_credentials() {
        assert!(!ExchangeConfig::read_only().has_credentials());
    }
}
