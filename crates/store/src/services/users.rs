//! User registration and password authentication.

use sqlx::PgPool;

use commerce_core::Email;

use super::ServiceError;
use crate::db::{RepositoryError, UserRepository};
use crate::dto::UserDto;
use crate::models::User;

/// Minimum password length, in characters.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// User account service.
pub struct UserService<'a> {
    users: UserRepository<'a>,
}

impl<'a> UserService<'a> {
    /// Create a new user service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            users: UserRepository::new(pool),
        }
    }

    /// Register a new user. The password is hashed before it is stored.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::WeakPassword` if the password is missing or too short.
    /// Returns `ServiceError::UserAlreadyExists` if the email is already registered.
    /// Returns `ServiceError::Repository` for other database errors.
    pub async fn register(&self, dto: UserDto) -> Result<UserDto, ServiceError> {
        validate_password(dto.password.as_deref().unwrap_or_default())?;

        if self.users.get_by_email(&dto.email).await?.is_some() {
            return Err(ServiceError::UserAlreadyExists);
        }

        let user = self
            .users
            .save(User::from(dto))
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => ServiceError::UserAlreadyExists,
                other => ServiceError::Repository(other),
            })?;

        tracing::info!(user_id = ?user.id, "Registered user");
        Ok(UserDto::from(&user))
    }

    /// Check an email/password pair.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::InvalidEmail` if the email format is invalid.
    /// Returns `ServiceError::InvalidCredentials` if the user is unknown or the password is wrong.
    /// Returns `ServiceError::Repository` if the lookup fails.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<UserDto, ServiceError> {
        let email = Email::parse(email)?;

        let user = self
            .users
            .get_by_email(&email)
            .await?
            .ok_or(ServiceError::InvalidCredentials)?;

        if !user.check_password(password) {
            return Err(ServiceError::InvalidCredentials);
        }

        Ok(UserDto::from(&user))
    }
}

fn validate_password(password: &str) -> Result<(), ServiceError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ServiceError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_password_length() {
        assert!(matches!(
            validate_password(""),
            Err(ServiceError::WeakPassword(_))
        ));
        assert!(matches!(
            validate_password("short"),
            Err(ServiceError::WeakPassword(_))
        ));
        assert!(validate_password("longenough").is_ok());
    }

    #[test]
    fn test_validate_password_counts_characters() {
        // 8 characters, 14 bytes
        assert!(validate_password("пароль12").is_ok());
    }
}
