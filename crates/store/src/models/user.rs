//! User domain type.

use std::fmt;

use commerce_core::{Email, UserId};

use super::Timestamps;
use crate::credentials;
use crate::db::{Entity, EntityQuery, RepositoryError};

/// A customer account.
///
/// `password` holds plaintext until the first save and the Argon2id hash
/// afterwards; the repository hooks do the conversion.
#[derive(Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct User {
    /// Unique user ID.
    pub id: Option<UserId>,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Login email (unique).
    pub email: Email,
    /// Plaintext before persist, hash after.
    pub password: String,
    /// Audit columns.
    #[sqlx(flatten)]
    pub timestamps: Timestamps,
}

impl User {
    /// Create an unsaved user.
    #[must_use]
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: Email,
        password: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            first_name: first_name.into(),
            last_name: last_name.into(),
            email,
            password: password.into(),
            timestamps: Timestamps::default(),
        }
    }

    /// "First Last".
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Check a candidate password against the stored hash.
    #[must_use]
    pub fn check_password(&self, candidate: &str) -> bool {
        credentials::verify_password(candidate, &self.password)
    }
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("timestamps", &self.timestamps)
            .finish()
    }
}

impl Entity for User {
    type Id = UserId;

    const TABLE: &'static str = "users";
    const COLUMNS: &'static [&'static str] = &["first_name", "last_name", "email", "password"];

    fn id(&self) -> Option<UserId> {
        self.id
    }

    fn bind_columns<'q>(&'q self, query: EntityQuery<'q, Self>) -> EntityQuery<'q, Self> {
        query
            .bind(&self.first_name)
            .bind(&self.last_name)
            .bind(&self.email)
            .bind(&self.password)
    }

    fn before_insert(&mut self) -> Result<(), RepositoryError> {
        if self.password.is_empty() {
            return Err(RepositoryError::Validation("password is required".to_owned()));
        }
        self.password = credentials::hash_password(&self.password)?;
        Ok(())
    }

    fn before_update(&mut self, stored: &Self) -> Result<(), RepositoryError> {
        // An empty password means "keep the current one".
        if self.password.is_empty() || self.password == stored.password {
            if !credentials::is_hashed(&stored.password) {
                return Err(RepositoryError::DataCorruption(format!(
                    "user {} has a password that is not a PHC hash",
                    stored.id.map_or(0, |id| id.as_i32())
                )));
            }
            self.password.clone_from(&stored.password);
        } else {
            self.password = credentials::hash_password(&self.password)?;
        }
        Ok(())
    }
}
