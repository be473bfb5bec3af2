//! OS-ROLES Configuration System
//!
//! TOML-based configuration with environment variable overrides.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

mod loader;

pub use loader::ConfigLoader;

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Root application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub http: HttpConfig,
    pub roles: RolesConfig,

    /// Base URL used when rendering `links.self` in API responses
    pub public_endpoint: String,

    /// Seed demo data at startup
    pub dev_mode: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            http: HttpConfig::default(),
            roles: RolesConfig::default(),
            public_endpoint: "http://localhost:5000/v3".to_string(),
            dev_mode: false,
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub port: u16,
    pub host: String,
    pub cors_origins: Vec<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            port: 5000,
            host: "0.0.0.0".to_string(),
            cors_origins: vec!["*".to_string()],
        }
    }
}

impl HttpConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Role store behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RolesConfig {
    /// Reject a role or permission whose name is already taken
    pub enforce_unique_names: bool,
}

impl Default for RolesConfig {
    fn default() -> Self {
        Self {
            enforce_unique_names: true,
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with environment variable override
    pub fn load() -> Result<Self, ConfigError> {
        ConfigLoader::new().load()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.http.host.trim().is_empty() {
            return Err(ConfigError::ValidationError("http.host must not be empty".to_string()));
        }
        if self.public_endpoint.trim().is_empty() {
            return Err(ConfigError::ValidationError("public_endpoint must not be empty".to_string()));
        }
        Ok(())
    }

    /// Public endpoint without a trailing slash
    pub fn base_url(&self) -> &str {
        self.public_endpoint.trim_end_matches('/')
    }

    /// Generate an example TOML configuration
    pub fn example_toml() -> String {
        r#"# OS-ROLES Configuration
# Environment variables override these settings

public_endpoint = "http://localhost:5000/v3"
dev_mode = false

[http]
port = 5000
host = "0.0.0.0"
cors_origins = ["*"]

[roles]
enforce_unique_names = true
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.http.port, 5000);
        assert!(config.roles.enforce_unique_names);
        assert!(!config.dev_mode);
        assert_eq!(config.http.bind_addr(), "0.0.0.0:5000");
    }

    #[test]
    fn test_example_toml_parses() {
        let config = AppConfig::from_toml_str(&AppConfig::example_toml()).unwrap();
        assert_eq!(config.http.port, 5000);
        assert_eq!(config.public_endpoint, "http://localhost:5000/v3");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = AppConfig::from_toml_str("[roles]\nenforce_unique_names = false\n").unwrap();
        assert!(!config.roles.enforce_unique_names);
        assert_eq!(config.http.port, 5000);
    }

    #[test]
    fn test_invalid_toml() {
        let err = AppConfig::from_toml_str("[http\nport = 1").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_validation_rejects_empty_endpoint() {
        let err = AppConfig::from_toml_str("public_endpoint = \"  \"\n").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_base_url_trims_slash() {
        let config = AppConfig {
            public_endpoint: "http://localhost/v3/".to_string(),
            ..Default::default()
        };
        assert_eq!(config.base_url(), "http://localhost/v3");
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[http]\nport = 9999").unwrap();
        let config = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(config.http.port, 9999);
    }
}
