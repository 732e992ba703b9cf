//! Review wire type.

use chrono::{DateTime, Utc};
use commerce_core::{ProductId, ReviewId, UserId};
use serde::{Deserialize, Serialize};

use super::wire_time;
use crate::models::{Review, Timestamps};

/// Wire form of a [`Review`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ReviewId>,
    pub product_id: ProductId,
    pub user_id: UserId,
    pub rating: i32,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub comment: String,
    #[serde(default, with = "wire_time", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, with = "wire_time", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, with = "wire_time", skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl From<&Review> for ReviewDto {
    fn from(review: &Review) -> Self {
        Self {
            id: review.id,
            product_id: review.product_id,
            user_id: review.user_id,
            rating: review.rating,
            title: review.title.clone(),
            comment: review.comment.clone(),
            created_at: review.timestamps.created_at,
            updated_at: review.timestamps.updated_at,
            deleted_at: review.timestamps.deleted_at,
        }
    }
}

impl From<ReviewDto> for Review {
    fn from(dto: ReviewDto) -> Self {
        Self {
            id: None,
            product_id: dto.product_id,
            user_id: dto.user_id,
            rating: dto.rating,
            title: dto.title,
            comment: dto.comment,
            timestamps: Timestamps::default(),
        }
    }
}
