//! Service configuration
//!
//! Sources, lowest precedence first:
//! 1. Built-in defaults
//! 2. TOML file (`--config PATH`, or `~/.discography/config.toml` if present)
//! 3. Environment: `DATABASE_URL`, `DISCOGRAPHY_BIND`
//! 4. Command-line flags (applied by the binary)
//!
//! ```toml
//! [server]
//! bind_addr = "127.0.0.1:3030"
//! cors_permissive = false
//! request_timeout_secs = 30
//!
//! [database]
//! url = "postgres://localhost/discography"
//! max_connections = 5
//! acquire_timeout_secs = 5
//! ```

use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::db::pool::{DEFAULT_ACQUIRE_TIMEOUT_SECS, DEFAULT_MAX_CONNECTIONS};

/// Environment variable holding the database URL
pub const DATABASE_URL_ENV: &str = "DATABASE_URL";

/// Environment variable overriding the bind address
pub const BIND_ENV: &str = "DISCOGRAPHY_BIND";

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid value for {var}: '{value}'")]
    InvalidEnv { var: &'static str, value: String },

    #[error("no database URL configured (set DATABASE_URL or [database].url)")]
    MissingDatabaseUrl,
}

/// Top-level configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
}

/// HTTP server settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to (default: 127.0.0.1:3030)
    pub bind_addr: SocketAddr,

    /// Allow permissive CORS (default: false = localhost only)
    ///
    /// WARNING: Setting this to true allows any origin.
    pub cors_permissive: bool,

    /// Per-request deadline
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3030)),
            cors_permissive: false,
            request_timeout_secs: 30,
        }
    }
}

/// Database settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: DEFAULT_MAX_CONNECTIONS,
            acquire_timeout_secs: DEFAULT_ACQUIRE_TIMEOUT_SECS,
        }
    }
}

impl AppConfig {
    /// Load configuration from file and environment.
    ///
    /// An explicit `path` must exist; the default path is optional.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default = Self::default_path();
                if default.exists() {
                    Self::from_file(&default)?
                } else {
                    Self::default()
                }
            }
        };

        config.apply_env(|var| std::env::var(var).ok())?;
        Ok(config)
    }

    /// Parse a TOML config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_owned(),
            source,
        })?;

        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_owned(),
            source,
        })
    }

    /// Default config file path: ~/.discography/config.toml
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".discography")
            .join("config.toml")
    }

    /// Apply environment overrides, reading variables through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(DATABASE_URL_ENV).filter(|u| !u.trim().is_empty()) {
            self.database.url = Some(url);
        }

        if let Some(bind) = lookup(BIND_ENV) {
            self.server.bind_addr = bind.parse().map_err(|_| ConfigError::InvalidEnv {
                var: BIND_ENV,
                value: bind,
            })?;
        }

        Ok(())
    }

    /// The configured database URL.
    pub fn database_url(&self) -> Result<&str, ConfigError> {
        self.database
            .url
            .as_deref()
            .ok_or(ConfigError::MissingDatabaseUrl)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::io::Write;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let config = AppConfig::default();
        assert_eq!(config.server.bind_addr.port(), 3030);
        assert!(!config.server.cors_permissive);
        assert_eq!(config.database.max_connections, DEFAULT_MAX_CONNECTIONS);
        assert!(matches!(
            config.database_url(),
            Err(ConfigError::MissingDatabaseUrl)
        ));
    }

    #[test]
    fn parses_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[database]\nurl = \"postgres://localhost/music\"\nmax_connections = 12"
        )
        .unwrap();

        let config = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(config.database_url().unwrap(), "postgres://localhost/music");
        assert_eq!(config.database.max_connections, 12);
        assert_eq!(
            config.database.acquire_timeout_secs,
            DEFAULT_ACQUIRE_TIMEOUT_SECS
        );
        assert_eq!(config.server.request_timeout_secs, 30);
    }

    #[test]
    fn rejects_invalid_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server\nbind_addr = ").unwrap();

        let err = AppConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = AppConfig::load(Some(&dir.path().join("absent.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn env_overrides_file() {
        let mut config = AppConfig::default();
        config.database.url = Some("postgres://file/db".into());

        config
            .apply_env(env(&[
                ("DATABASE_URL", "postgres://env/db"),
                ("DISCOGRAPHY_BIND", "0.0.0.0:8080"),
            ]))
            .unwrap();

        assert_eq!(config.database_url().unwrap(), "postgres://env/db");
        assert_eq!(config.server.bind_addr.port(), 8080);
    }

    #[test]
    fn blank_database_url_is_ignored() {
        let mut config = AppConfig::default();
        config.apply_env(env(&[("DATABASE_URL", "  ")])).unwrap();
        assert!(config.database.url.is_none());
    }

    #[test]
    fn invalid_bind_env() {
        let mut config = AppConfig::default();
        let err = config
            .apply_env(env(&[("DISCOGRAPHY_BIND", "not-an-addr")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnv { var: "DISCOGRAPHY_BIND", .. }));
    }
}
