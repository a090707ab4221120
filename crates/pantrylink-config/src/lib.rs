//! Typed configuration for the PantryLink gateway.
//!
//! Configuration is loaded from a TOML or JSON file, then overridden by
//! `PANTRYLINK_`-prefixed environment variables, then validated. All
//! sections have sensible defaults so the gateway can start with nothing
//! but a Grocy URL and key.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use pantrylink_core::CommandBarcodes;

/// Result type alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// The config file could not be parsed.
    #[error("invalid config: {message}")]
    Parse {
        /// Parser failure description.
        message: String,
    },

    /// The configuration is semantically invalid.
    #[error("invalid config: {message}")]
    Invalid {
        /// Validation failure description.
        message: String,
    },
}

impl ConfigError {
    fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }
}

/// Gateway configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP server settings.
    pub server: ServerSettings,
    /// API-key authentication settings.
    pub auth: AuthSettings,
    /// Remote inventory (Grocy) settings.
    pub grocy: GrocySettings,
    /// Third-party lookup settings.
    pub lookup: LookupSettings,
    /// Command-barcode table.
    pub barcodes: CommandBarcodes,
}

impl AppConfig {
    /// Loads configuration from a TOML or JSON file, by extension.
    pub fn from_file(path: impl Into<PathBuf>) -> ConfigResult<Self> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)?;

        let extension = path.extension().and_then(|s| s.to_str()).unwrap_or("");
        match extension {
            "toml" => toml::from_str(&content)
                .map_err(|e| ConfigError::parse(format!("invalid TOML: {e}"))),
            "json" => serde_json::from_str(&content)
                .map_err(|e| ConfigError::parse(format!("invalid JSON: {e}"))),
            _ => Err(ConfigError::parse(format!(
                "unsupported config format: {extension}"
            ))),
        }
    }

    /// Applies environment variable overrides.
    ///
    /// Variables are prefixed with `PANTRYLINK_` and use uppercase
    /// snake_case.
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(addr) = std::env::var("PANTRYLINK_LISTEN_ADDR") {
            self.server.listen_addr = addr;
        }

        if let Ok(port) = std::env::var("PANTRYLINK_LISTEN_PORT") {
            if let Ok(port) = port.parse() {
                self.server.listen_port = port;
            }
        }

        if let Ok(url) = std::env::var("PANTRYLINK_GROCY_URL") {
            self.grocy.url = url;
        }

        if let Ok(key) = std::env::var("PANTRYLINK_GROCY_API_KEY") {
            self.grocy.api_key = key;
        }

        if let Ok(require) = std::env::var("PANTRYLINK_REQUIRE_API_KEY") {
            if let Ok(require) = require.parse() {
                self.auth.require_api_key = require;
            }
        }

        if let Ok(key) = std::env::var("PANTRYLINK_API_KEY") {
            self.auth.api_keys.push(key);
        }

        if let Ok(url) = std::env::var("PANTRYLINK_LOOKUP_URL") {
            self.lookup.url = url;
        }

        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.grocy.url.is_empty() {
            return Err(ConfigError::invalid("grocy.url is required"));
        }

        if !self.grocy.url.starts_with("http://") && !self.grocy.url.starts_with("https://") {
            return Err(ConfigError::invalid(
                "grocy.url must start with http:// or https://",
            ));
        }

        if self.auth.require_api_key && self.auth.api_keys.is_empty() {
            return Err(ConfigError::invalid(
                "auth.require_api_key is set but no API keys are configured",
            ));
        }

        Ok(())
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Address to bind to.
    pub listen_addr: String,
    /// Port the gateway listens on.
    pub listen_port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0".to_string(),
            listen_port: 8123,
        }
    }
}

/// API-key authentication settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthSettings {
    /// Whether `/api` requests must present a valid key.
    pub require_api_key: bool,
    /// Keys accepted via the `BBUDDY-API-KEY` header or the `apikey`
    /// query parameter.
    pub api_keys: Vec<String>,
}

/// Remote inventory settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GrocySettings {
    /// Base URL of the Grocy instance.
    pub url: String,
    /// API key sent with every inventory call.
    pub api_key: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for GrocySettings {
    fn default() -> Self {
        Self {
            url: "http://localhost:9283".to_string(),
            api_key: String::new(),
            timeout_secs: 30,
        }
    }
}

/// Third-party lookup settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupSettings {
    /// Base URL of the lookup service.
    pub url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for LookupSettings {
    fn default() -> Self {
        Self {
            url: "https://world.openfoodfacts.org".to_string(),
            timeout_secs: 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_valid_without_auth() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.server.listen_port, 8123);
        assert_eq!(config.grocy.timeout_secs, 30);
    }

    #[test]
    fn toml_round_trip() {
        let toml = r#"
[server]
listen_port = 9000

[auth]
require_api_key = true
api_keys = ["secret"]

[grocy]
url = "https://grocy.example"
api_key = "grocy-key"

[barcodes]
consume = "CMD-CONSUME"
"#;
        let config: AppConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.server.listen_port, 9000);
        assert!(config.auth.require_api_key);
        assert_eq!(config.grocy.url, "https://grocy.example");
        assert_eq!(config.barcodes.consume, "CMD-CONSUME");
        // Unset command barcodes keep their defaults.
        assert_eq!(config.barcodes.purchase, "BBUDDY-P");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn from_file_dispatches_on_extension() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        writeln!(file, "[server]\nlisten_port = 9100").unwrap();

        let config = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(config.server.listen_port, 9100);
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        assert!(AppConfig::from_file(file.path()).is_err());
    }

    #[test]
    fn missing_grocy_url_is_invalid() {
        let mut config = AppConfig::default();
        config.grocy.url = String::new();
        assert!(config.validate().is_err());

        config.grocy.url = "grocy.example".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn auth_without_keys_is_invalid() {
        let mut config = AppConfig::default();
        config.auth.require_api_key = true;
        assert!(config.validate().is_err());

        config.auth.api_keys.push("secret".to_string());
        assert!(config.validate().is_ok());
    }
}
