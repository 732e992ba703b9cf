//! Database operations for the commerce `PostgreSQL` database.
//!
//! ## Tables
//!
//! - `users` - Customers with argon2 password hashes
//! - `addresses` - User shipping/billing addresses
//! - `products` - Catalog entries (unique SKU)
//! - `categories` - Category tree (adjacency list via `parent_id`)
//! - `product_categories` - Product/category links
//! - `reviews` - Product reviews by users
//! - `orders` - Orders (unique order number)
//! - `order_items` - Line items, written together with their order
//! - `payments` - Payments against orders
//!
//! Every table carries `created_at`, `updated_at` and a nullable `deleted_at`.
//! Soft-deleted rows are still returned by [`Repository::get_by_id`] and are
//! excluded from every list query.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/store/migrations/` and run via:
//! ```bash
//! cargo run -p commerce-cli -- migrate
//! ```

pub mod addresses;
pub mod categories;
pub mod orders;
pub mod payments;
pub mod products;
pub mod repository;
pub mod reviews;
pub mod users;

use std::time::Duration;

use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use crate::config::DbConfig;

pub use addresses::AddressRepository;
pub use categories::{CategoryNode, CategoryRepository, MAX_TREE_DEPTH, ProductCategoryRepository};
pub use orders::{OrderItemRepository, OrderRepository};
pub use payments::PaymentRepository;
pub use products::ProductRepository;
pub use repository::{Entity, EntityQuery, Repository};
pub use reviews::ReviewRepository;
pub use users::UserRepository;

/// Embedded migrations from `crates/store/migrations/`.
pub static MIGRATOR: Migrator = sqlx::migrate!();

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),

    /// Entity failed validation before it reached the database.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Password hashing failed.
    #[error("password hashing error")]
    Credential,
}

/// Translate constraint violations into [`RepositoryError`] variants.
///
/// Unique and foreign-key violations become `Conflict`, check violations
/// become `Validation`; anything else stays a `Database` error.
pub(crate) fn map_db_error(e: sqlx::Error) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e {
        if db_err.is_unique_violation() {
            let what = db_err.constraint().unwrap_or("value");
            return RepositoryError::Conflict(format!("{what} already exists"));
        }
        if db_err.is_foreign_key_violation() {
            return RepositoryError::Conflict(format!(
                "foreign key violation: {}",
                db_err.message()
            ));
        }
        if db_err.is_check_violation() {
            return RepositoryError::Validation(db_err.message().to_owned());
        }
    }
    RepositoryError::Database(e)
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(config: &DbConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(config.connect_options())
        .await
}

/// Create the configured schema if it does not exist yet.
///
/// Tables and enum types are created by migrations inside whatever schema
/// leads the connection's `search_path`, so it has to exist first.
///
/// # Errors
///
/// Returns `sqlx::Error` if the statement fails.
pub async fn ensure_schema(pool: &PgPool, schema: &str) -> Result<(), sqlx::Error> {
    let sql = format!("CREATE SCHEMA IF NOT EXISTS {}", quote_ident(schema));
    sqlx::query(&sql).execute(pool).await?;
    Ok(())
}

/// Run all pending migrations.
///
/// # Errors
///
/// Returns `MigrateError` if a migration fails or the history is inconsistent.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    MIGRATOR.run(pool).await
}

/// Quote a `PostgreSQL` identifier.
fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}
