//! Category and product/category link types.

use std::future::Future;

use commerce_core::{CategoryId, ProductCategoryId, ProductId};
use sqlx::PgConnection;

use super::Timestamps;
use crate::db::{Entity, EntityQuery, RepositoryError};

/// A product category.
///
/// Categories form a tree through `parent_id`; children are loaded on demand
/// with bounded depth (see [`crate::db::CategoryRepository::get_tree`]).
/// Saving a category whose parent chain would lead back to it fails with
/// `RepositoryError::Validation`.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Category {
    /// Unique category ID.
    pub id: Option<CategoryId>,
    /// Display name.
    pub name: String,
    /// Description.
    pub description: String,
    /// URL slug.
    pub slug: String,
    /// Parent category, `None` for roots.
    pub parent_id: Option<CategoryId>,
    /// Whether the category is shown.
    pub is_active: bool,
    /// Audit columns.
    #[sqlx(flatten)]
    pub timestamps: Timestamps,
}

impl Category {
    /// Create an unsaved, active category.
    #[must_use]
    pub fn new(name: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            description: String::new(),
            slug: slug.into(),
            parent_id: None,
            is_active: true,
            timestamps: Timestamps::default(),
        }
    }
}

impl Entity for Category {
    type Id = CategoryId;

    const TABLE: &'static str = "categories";
    const COLUMNS: &'static [&'static str] =
        &["name", "description", "slug", "parent_id", "is_active"];

    fn id(&self) -> Option<CategoryId> {
        self.id
    }

    fn bind_columns<'q>(&'q self, query: EntityQuery<'q, Self>) -> EntityQuery<'q, Self> {
        query
            .bind(&self.name)
            .bind(&self.description)
            .bind(&self.slug)
            .bind(self.parent_id)
            .bind(self.is_active)
    }

    fn after_save(
        conn: &mut PgConnection,
        saved: &mut Self,
        _input: Self,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send {
        crate::db::categories::ensure_acyclic(conn, saved.id, saved.parent_id)
    }
}

/// Link between a product and one of its categories.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct ProductCategory {
    /// Unique link ID.
    pub id: Option<ProductCategoryId>,
    /// Linked product.
    pub product_id: ProductId,
    /// Linked category.
    pub category_id: CategoryId,
    /// Audit columns.
    #[sqlx(flatten)]
    pub timestamps: Timestamps,
}

impl ProductCategory {
    /// Create an unsaved link.
    #[must_use]
    pub fn new(product_id: ProductId, category_id: CategoryId) -> Self {
        Self {
            id: None,
            product_id,
            category_id,
            timestamps: Timestamps::default(),
        }
    }
}

impl Entity for ProductCategory {
    type Id = ProductCategoryId;

    const TABLE: &'static str = "product_categories";
    const COLUMNS: &'static [&'static str] = &["product_id", "category_id"];

    fn id(&self) -> Option<ProductCategoryId> {
        self.id
    }

    fn bind_columns<'q>(&'q self, query: EntityQuery<'q, Self>) -> EntityQuery<'q, Self> {
        query.bind(self.product_id).bind(self.category_id)
    }
}
