//! User management commands.
//!
//! # Usage
//!
//! ```bash
//! commerce-cli user create -f Ada -l Lovelace -e ada@example.com -p 'correct horse'
//! ```

use std::path::Path;

use commerce_core::Email;
use commerce_store::dto::UserDto;
use commerce_store::services::{ServiceError, UserService};
use thiserror::Error;

use super::ConnectError;

/// Errors that can occur during user operations.
#[derive(Debug, Error)]
pub enum UserError {
    #[error(transparent)]
    Connect(#[from] ConnectError),

    /// Invalid email.
    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] commerce_core::EmailError),

    #[error(transparent)]
    Service(#[from] ServiceError),
}

/// Register a new user.
///
/// # Returns
///
/// The ID of the created user.
///
/// # Errors
///
/// Returns `UserError` if the email is invalid, the password is too short,
/// the email is taken, or the database is unreachable.
pub async fn create(
    config_path: Option<&Path>,
    first_name: &str,
    last_name: &str,
    email: &str,
    password: &str,
) -> Result<Option<i32>, UserError> {
    let email = Email::parse(email)?;
    let (_, pool) = super::connect(config_path).await?;

    tracing::info!("Creating user: {}", email);

    let dto = UserDto {
        id: None,
        first_name: first_name.to_owned(),
        last_name: last_name.to_owned(),
        email,
        password: None,
        created_at: None,
        updated_at: None,
        deleted_at: None,
    }
    .with_password(password);

    let user = UserService::new(&pool).register(dto).await?;
    let user_id = user.id.map(|id| id.as_i32());

    tracing::info!(
        "User created successfully! ID: {}, Email: {}",
        user_id.unwrap_or_default(),
        user.email
    );

    Ok(user_id)
}
