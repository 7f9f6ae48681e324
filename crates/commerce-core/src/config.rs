//! Server configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the HTTP server and storage layer.
///
/// All fields are optional in the TOML file; `effective_*()` accessors
/// apply the defaults. `COMMERCE_ADDR` and `COMMERCE_DB` environment
/// variables override the file.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address. Default: "127.0.0.1:8080".
    pub bind_addr: Option<String>,
    /// SQLite database path. Default: "commerce.db".
    pub database_path: Option<String>,
    /// Default tracing filter when RUST_LOG is unset. Default: "info".
    pub log_filter: Option<String>,
}

impl ServerConfig {
    /// Load from a TOML file if it exists, then apply env overrides.
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let mut config = match std::fs::read_to_string(path) {
            Ok(text) => toml::from_str(&text).map_err(|e| ConfigError::Parse {
                path: path.to_string(),
                message: e.to_string(),
            })?,
            Err(_) => Self::default(),
        };

        if let Ok(addr) = std::env::var("COMMERCE_ADDR") {
            config.bind_addr = Some(addr);
        }
        if let Ok(db) = std::env::var("COMMERCE_DB") {
            config.database_path = Some(db);
        }

        Ok(config)
    }

    /// Returns the effective bind address.
    pub fn effective_bind_addr(&self) -> &str {
        self.bind_addr.as_deref().unwrap_or("127.0.0.1:8080")
    }

    /// Returns the effective database path.
    pub fn effective_database_path(&self) -> &str {
        self.database_path.as_deref().unwrap_or("commerce.db")
    }

    /// Returns the effective log filter.
    pub fn effective_log_filter(&self) -> &str {
        self.log_filter.as_deref().unwrap_or("info")
    }
}

/// Errors from configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to parse {path}: {message}")]
    Parse { path: String, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_fields_missing() {
        let config: ServerConfig = toml::from_str("").unwrap();
        assert_eq!(config.effective_bind_addr(), "127.0.0.1:8080");
        assert_eq!(config.effective_database_path(), "commerce.db");
        assert_eq!(config.effective_log_filter(), "info");
    }

    #[test]
    fn file_values_win_over_defaults() {
        let config: ServerConfig =
            toml::from_str("bind_addr = \"0.0.0.0:9000\"\nlog_filter = \"debug\"").unwrap();
        assert_eq!(config.effective_bind_addr(), "0.0.0.0:9000");
        assert_eq!(config.effective_log_filter(), "debug");
    }
}
