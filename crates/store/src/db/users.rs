//! User lookups.

use commerce_core::Email;

use super::{Repository, RepositoryError};
use crate::models::User;

/// Repository for users.
pub type UserRepository<'a> = Repository<'a, User>;

impl Repository<'_, User> {
    /// Get a live user by email address.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        self.find_one_by("email", email.as_str().to_owned()).await
    }
}
