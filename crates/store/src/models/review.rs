//! Review domain type.

use std::ops::RangeInclusive;

use commerce_core::{ProductId, ReviewId, UserId};

use super::Timestamps;
use crate::db::{Entity, EntityQuery, RepositoryError};

/// Allowed star ratings.
pub const RATING_RANGE: RangeInclusive<i32> = 1..=5;

/// A user's review of a product.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Review {
    /// Unique review ID.
    pub id: Option<ReviewId>,
    /// Reviewed product.
    pub product_id: ProductId,
    /// Author.
    pub user_id: UserId,
    /// Star rating, within [`RATING_RANGE`].
    pub rating: i32,
    /// Headline.
    pub title: String,
    /// Body text.
    pub comment: String,
    /// Audit columns.
    #[sqlx(flatten)]
    pub timestamps: Timestamps,
}

impl Review {
    fn validate(&self) -> Result<(), RepositoryError> {
        if RATING_RANGE.contains(&self.rating) {
            Ok(())
        } else {
            Err(RepositoryError::Validation(format!(
                "rating must be between {} and {}, got {}",
                RATING_RANGE.start(),
                RATING_RANGE.end(),
                self.rating
            )))
        }
    }
}

impl Entity for Review {
    type Id = ReviewId;

    const TABLE: &'static str = "reviews";
    const COLUMNS: &'static [&'static str] =
        &["product_id", "user_id", "rating", "title", "comment"];

    fn id(&self) -> Option<ReviewId> {
        self.id
    }

    fn bind_columns<'q>(&'q self, query: EntityQuery<'q, Self>) -> EntityQuery<'q, Self> {
        query
            .bind(self.product_id)
            .bind(self.user_id)
            .bind(self.rating)
            .bind(&self.title)
            .bind(&self.comment)
    }

    fn before_insert(&mut self) -> Result<(), RepositoryError> {
        self.validate()
    }

    fn before_update(&mut self, _stored: &Self) -> Result<(), RepositoryError> {
        self.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn review(rating: i32) -> Review {
        Review {
            id: None,
            product_id: ProductId::new(1),
            user_id: UserId::new(1),
            rating,
            title: "Solid".to_owned(),
            comment: "Does what it says.".to_owned(),
            timestamps: Timestamps::default(),
        }
    }

    #[test]
    fn test_rating_bounds_accepted() {
        assert!(review(1).before_insert().is_ok());
        assert!(review(5).before_insert().is_ok());
    }

    #[test]
    fn test_rating_out_of_range_rejected() {
        assert!(matches!(
            review(0).before_insert(),
            Err(RepositoryError::Validation(_))
        ));
        let stored = review(3);
        assert!(matches!(
            review(6).before_update(&stored),
            Err(RepositoryError::Validation(_))
        ));
    }
}
