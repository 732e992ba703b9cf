//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! commerce-cli migrate --config dbconfig.json
//! ```
//!
//! Creates the configured schema if needed, then applies the migrations in
//! `crates/store/migrations/` inside it.

use std::path::Path;

use commerce_store::db;
use thiserror::Error;

use super::ConnectError;

/// Errors that can occur during migration.
#[derive(Debug, Error)]
pub enum MigrationError {
    #[error(transparent)]
    Connect(#[from] ConnectError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Run database migrations.
///
/// # Errors
///
/// Returns `MigrationError` if the connection, schema creation or a migration fails.
pub async fn run(config_path: Option<&Path>) -> Result<(), MigrationError> {
    let (config, pool) = super::connect(config_path).await?;

    tracing::info!(schema = %config.schema, "Ensuring schema exists...");
    db::ensure_schema(&pool, &config.schema).await?;

    tracing::info!("Running migrations...");
    db::run_migrations(&pool).await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
