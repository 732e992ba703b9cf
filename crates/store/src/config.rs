//! Database configuration.
//!
//! A JSON config file takes precedence. If no file is given, or it cannot be
//! read or parsed, configuration comes from environment variables (after
//! loading `.env` if present). [`LoadedConfig::source`] records which one was
//! used and why the file was skipped.
//!
//! # Config File
//!
//! ```json
//! { "host": "localhost", "user": "commerce", "db_name": "commerce",
//!   "port": 5432, "password": "...", "ssl_mode": "disable", "schema": "public" }
//! ```
//!
//! `PascalCase` keys (`Host`, `DbName`, `SSLMode`, ...) are accepted too.
//!
//! # Environment Variables
//!
//! ## Required
//! - `DB_USER` - Database role
//! - `DB_NAME` - Database name
//!
//! ## Optional
//! - `DB_HOST` - Server host (default: localhost)
//! - `DB_PORT` - Server port (default: 5432; invalid values fall back to the default)
//! - `DB_PASSWORD` - Role password (default: empty)
//! - `DB_SSLMODE` - `disable`, `prefer`, `require`, ... (default: disable)
//! - `DB_SCHEMA` - Schema used as `search_path` (default: public)

use std::fmt;
use std::path::{Path, PathBuf};

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use sqlx::postgres::{PgConnectOptions, PgSslMode};
use thiserror::Error;

const DEFAULT_HOST: &str = "localhost";
const DEFAULT_PORT: u16 = 5432;
const DEFAULT_SSL_MODE: &str = "disable";
const DEFAULT_SCHEMA: &str = "public";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Failed to read config file {}: {source}", path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config file {}: {source}", path.display())]
    ParseFile {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Invalid config value {0}: {1}")]
    InvalidValue(String, String),
}

/// Where a [`DbConfig`] came from.
#[derive(Debug)]
pub enum ConfigSource {
    /// Parsed from this JSON file.
    File(PathBuf),
    /// Read from the environment; `file_error` is why the file was not used.
    Environment { file_error: Option<ConfigError> },
}

/// A configuration together with its source.
#[derive(Debug)]
pub struct LoadedConfig {
    pub config: DbConfig,
    pub source: ConfigSource,
}

/// `PostgreSQL` connection settings.
///
/// Implements `Debug` manually to redact the password.
#[derive(Clone)]
pub struct DbConfig {
    /// Server host
    pub host: String,
    /// Database role
    pub user: String,
    /// Database name
    pub db_name: String,
    /// Server port
    pub port: u16,
    /// Role password
    pub password: SecretString,
    /// TLS mode
    pub ssl_mode: PgSslMode,
    /// Schema placed first on the `search_path`
    pub schema: String,
}

impl fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbConfig")
            .field("host", &self.host)
            .field("user", &self.user)
            .field("db_name", &self.db_name)
            .field("port", &self.port)
            .field("password", &"[REDACTED]")
            .field("ssl_mode", &self.ssl_mode)
            .field("schema", &self.schema)
            .finish()
    }
}

/// On-disk shape of the config file.
#[derive(Deserialize)]
struct FileConfig {
    #[serde(default, alias = "Host")]
    host: Option<String>,
    #[serde(alias = "User")]
    user: String,
    #[serde(alias = "DbName")]
    db_name: String,
    #[serde(default, alias = "Port")]
    port: Option<u16>,
    #[serde(default, alias = "Password")]
    password: Option<String>,
    #[serde(default, alias = "SSLMode", alias = "sslmode")]
    ssl_mode: Option<String>,
    #[serde(default, alias = "Schema")]
    schema: Option<String>,
}

impl DbConfig {
    /// Load configuration, preferring `path` and falling back to the environment.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file is unusable and the environment is
    /// missing required variables or holds invalid values.
    pub fn load(path: Option<&Path>) -> Result<LoadedConfig, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        load_with(path, |key| std::env::var(key).ok())
    }

    /// Parse a JSON config file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ReadFile` or `ConfigError::ParseFile` if the file
    /// cannot be used, `ConfigError::InvalidValue` for a bad `ssl_mode`.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&contents).map_err(|e| match e {
            ConfigError::ParseFile { source, .. } => ConfigError::ParseFile {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })
    }

    fn from_json(contents: &str) -> Result<Self, ConfigError> {
        let file: FileConfig =
            serde_json::from_str(contents).map_err(|source| ConfigError::ParseFile {
                path: PathBuf::new(),
                source,
            })?;

        let ssl_mode = parse_ssl_mode(file.ssl_mode.as_deref().unwrap_or(DEFAULT_SSL_MODE))
            .map_err(|e| ConfigError::InvalidValue("ssl_mode".to_string(), e))?;

        Ok(Self {
            host: non_empty(file.host).unwrap_or_else(|| DEFAULT_HOST.to_string()),
            user: file.user,
            db_name: file.db_name,
            port: file.port.unwrap_or(DEFAULT_PORT),
            password: SecretString::from(file.password.unwrap_or_default()),
            ssl_mode,
            schema: non_empty(file.schema).unwrap_or_else(|| DEFAULT_SCHEMA.to_string()),
        })
    }

    /// Load configuration from environment variables only.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or `DB_SSLMODE` is invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from a variable lookup function.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or `DB_SSLMODE` is invalid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| non_empty(lookup(key));
        let required =
            |key: &str| get(key).ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()));

        let port = match get("DB_PORT") {
            Some(raw) => raw.parse::<u16>().unwrap_or_else(|e| {
                tracing::warn!(value = %raw, error = %e, "Invalid DB_PORT, using {DEFAULT_PORT}");
                DEFAULT_PORT
            }),
            None => DEFAULT_PORT,
        };

        let ssl_mode = parse_ssl_mode(&get("DB_SSLMODE").unwrap_or_else(|| DEFAULT_SSL_MODE.to_string()))
            .map_err(|e| ConfigError::InvalidEnvVar("DB_SSLMODE".to_string(), e))?;

        Ok(Self {
            host: get("DB_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            user: required("DB_USER")?,
            db_name: required("DB_NAME")?,
            port,
            password: SecretString::from(get("DB_PASSWORD").unwrap_or_default()),
            ssl_mode,
            schema: get("DB_SCHEMA").unwrap_or_else(|| DEFAULT_SCHEMA.to_string()),
        })
    }

    /// Connection options for this configuration, with `search_path` set
    /// to the configured schema.
    #[must_use]
    pub fn connect_options(&self) -> PgConnectOptions {
        let options = PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .database(&self.db_name)
            .ssl_mode(self.ssl_mode)
            .options([("search_path", self.schema.as_str())]);

        let password = self.password.expose_secret();
        if password.is_empty() {
            options
        } else {
            options.password(password)
        }
    }
}

fn load_with<F>(path: Option<&Path>, lookup: F) -> Result<LoadedConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let file_error = match path {
        Some(path) => match DbConfig::from_file(path) {
            Ok(config) => {
                tracing::info!(path = %path.display(), "Loaded database configuration from file");
                return Ok(LoadedConfig {
                    config,
                    source: ConfigSource::File(path.to_path_buf()),
                });
            }
            Err(e) => {
                tracing::warn!(error = %e, "Config file unusable, falling back to environment");
                Some(e)
            }
        },
        None => None,
    };

    let config = DbConfig::from_lookup(lookup)?;
    tracing::info!("Loaded database configuration from environment");

    Ok(LoadedConfig {
        config,
        source: ConfigSource::Environment { file_error },
    })
}

fn parse_ssl_mode(raw: &str) -> Result<PgSslMode, String> {
    raw.parse::<PgSslMode>().map_err(|e| e.to_string())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
