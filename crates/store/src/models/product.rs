//! Product domain type.

use std::future::Future;

use commerce_core::ProductId;
use rust_decimal::Decimal;
use sqlx::PgPool;

use super::{Category, Review, Timestamps};
use crate::db::{Entity, EntityQuery, RepositoryError};

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Product {
    /// Unique product ID.
    pub id: Option<ProductId>,
    /// Display name.
    pub name: String,
    /// Unit price, two decimal places.
    pub price: Decimal,
    /// Description.
    pub description: String,
    /// Stock keeping unit (unique).
    pub sku: String,
    /// Units on hand.
    pub stock: i32,
    /// Whether the product is listed.
    pub is_active: bool,
    /// Whether the product is featured.
    pub is_featured: bool,
    /// Linked categories, loaded on read. Links are written through
    /// [`crate::db::ProductCategoryRepository`], not by saving the product.
    #[sqlx(skip)]
    pub categories: Vec<Category>,
    /// Live reviews, loaded on read.
    #[sqlx(skip)]
    pub reviews: Vec<Review>,
    /// Audit columns.
    #[sqlx(flatten)]
    pub timestamps: Timestamps,
}

impl Product {
    /// Create an unsaved, active, non-featured product with no stock.
    #[must_use]
    pub fn new(name: impl Into<String>, sku: impl Into<String>, price: Decimal) -> Self {
        Self {
            id: None,
            name: name.into(),
            price,
            description: String::new(),
            sku: sku.into(),
            stock: 0,
            is_active: true,
            is_featured: false,
            categories: Vec::new(),
            reviews: Vec::new(),
            timestamps: Timestamps::default(),
        }
    }
}

impl Entity for Product {
    type Id = ProductId;

    const TABLE: &'static str = "products";
    const COLUMNS: &'static [&'static str] = &[
        "name",
        "price",
        "description",
        "sku",
        "stock",
        "is_active",
        "is_featured",
    ];

    fn id(&self) -> Option<ProductId> {
        self.id
    }

    fn bind_columns<'q>(&'q self, query: EntityQuery<'q, Self>) -> EntityQuery<'q, Self> {
        query
            .bind(&self.name)
            .bind(self.price)
            .bind(&self.description)
            .bind(&self.sku)
            .bind(self.stock)
            .bind(self.is_active)
            .bind(self.is_featured)
    }

    fn load_relations(
        pool: &PgPool,
        entities: &mut [Self],
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send {
        crate::db::products::load_relations(pool, entities)
    }
}
