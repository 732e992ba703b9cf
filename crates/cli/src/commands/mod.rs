//! Subcommand implementations.

use std::path::Path;

use commerce_store::config::{ConfigError, ConfigSource, DbConfig};
use commerce_store::db;
use sqlx::PgPool;
use thiserror::Error;

pub mod category;
pub mod migrate;
pub mod user;

/// Errors that can occur while preparing a database connection.
#[derive(Debug, Error)]
pub enum ConnectError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Database connection error.
    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Load configuration and open a pool.
async fn connect(config_path: Option<&Path>) -> Result<(DbConfig, PgPool), ConnectError> {
    let loaded = DbConfig::load(config_path)?;
    if let ConfigSource::Environment {
        file_error: Some(ref e),
    } = loaded.source
    {
        tracing::warn!("Using environment configuration because the config file failed: {e}");
    }

    let config = loaded.config;
    tracing::info!(
        host = %config.host,
        port = config.port,
        database = %config.db_name,
        schema = %config.schema,
        "Connecting to database..."
    );
    let pool = db::create_pool(&config).await?;

    Ok((config, pool))
}
