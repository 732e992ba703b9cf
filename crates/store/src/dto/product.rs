//! Product wire type.

use chrono::{DateTime, Utc};
use commerce_core::ProductId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{CategoryDto, ReviewDto, default_true, wire_time};
use crate::models::{Category, Product, Review, Timestamps};

/// Wire form of a [`Product`], with its categories and reviews.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ProductId>,
    pub name: String,
    pub price: Decimal,
    #[serde(default)]
    pub description: String,
    pub sku: String,
    #[serde(default)]
    pub stock: i32,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub categories: Vec<CategoryDto>,
    #[serde(default)]
    pub reviews: Vec<ReviewDto>,
    #[serde(default, with = "wire_time", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, with = "wire_time", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, with = "wire_time", skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl From<&Product> for ProductDto {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            price: product.price,
            description: product.description.clone(),
            sku: product.sku.clone(),
            stock: product.stock,
            is_active: product.is_active,
            is_featured: product.is_featured,
            categories: product.categories.iter().map(CategoryDto::from).collect(),
            reviews: product.reviews.iter().map(ReviewDto::from).collect(),
            created_at: product.timestamps.created_at,
            updated_at: product.timestamps.updated_at,
            deleted_at: product.timestamps.deleted_at,
        }
    }
}

impl From<ProductDto> for Product {
    fn from(dto: ProductDto) -> Self {
        Self {
            id: None,
            name: dto.name,
            price: dto.price,
            description: dto.description,
            sku: dto.sku,
            stock: dto.stock,
            is_active: dto.is_active,
            is_featured: dto.is_featured,
            categories: dto.categories.into_iter().map(Category::from).collect(),
            reviews: dto.reviews.into_iter().map(Review::from).collect(),
            timestamps: Timestamps::default(),
        }
    }
}
