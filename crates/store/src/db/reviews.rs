//! Review lookups.

use commerce_core::{ProductId, UserId};

use super::{Repository, RepositoryError};
use crate::models::Review;

/// Repository for reviews.
pub type ReviewRepository<'a> = Repository<'a, Review>;

impl Repository<'_, Review> {
    /// Live reviews of a product, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_product_id(&self, product_id: ProductId) -> Result<Vec<Review>, RepositoryError> {
        self.find_by("product_id", product_id).await
    }

    /// Live reviews written by a user, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_user_id(&self, user_id: UserId) -> Result<Vec<Review>, RepositoryError> {
        self.find_by("user_id", user_id).await
    }
}
