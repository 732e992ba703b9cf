//! Product lookups and relation loading.

use std::collections::HashMap;

use commerce_core::{CategoryId, ProductId};
use sqlx::PgPool;

use super::{Repository, RepositoryError};
use crate::models::{Category, Product, Review};

/// Repository for products.
pub type ProductRepository<'a> = Repository<'a, Product>;

impl Repository<'_, Product> {
    /// Get a live product by SKU.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_sku(&self, sku: &str) -> Result<Option<Product>, RepositoryError> {
        self.find_one_by("sku", sku.to_owned()).await
    }

    /// Live products linked to a category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_category_id(
        &self,
        category_id: CategoryId,
    ) -> Result<Vec<Product>, RepositoryError> {
        let products = sqlx::query_as::<_, Product>(
            r"
            SELECT p.*
            FROM products p
            JOIN product_categories pc ON pc.product_id = p.id
            WHERE pc.category_id = $1
              AND pc.deleted_at IS NULL
              AND p.deleted_at IS NULL
            ORDER BY p.id
            ",
        )
        .bind(category_id)
        .fetch_all(self.pool())
        .await?;

        self.with_relations(products).await
    }
}

/// A category joined with the product it is linked to.
#[derive(sqlx::FromRow)]
struct LinkedCategoryRow {
    product_id: ProductId,
    #[sqlx(flatten)]
    category: Category,
}

/// Load live categories and reviews for a batch of products.
///
/// Two queries regardless of batch size; categories keep link order and
/// reviews keep insertion order.
pub(crate) async fn load_relations(
    pool: &PgPool,
    products: &mut [Product],
) -> Result<(), RepositoryError> {
    let ids: Vec<i32> = products
        .iter()
        .filter_map(|p| p.id)
        .map(|id| id.as_i32())
        .collect();
    if ids.is_empty() {
        return Ok(());
    }

    let links = sqlx::query_as::<_, LinkedCategoryRow>(
        r"
        SELECT pc.product_id, c.*
        FROM product_categories pc
        JOIN categories c ON c.id = pc.category_id
        WHERE pc.product_id = ANY($1)
          AND pc.deleted_at IS NULL
          AND c.deleted_at IS NULL
        ORDER BY pc.id
        ",
    )
    .bind(ids.as_slice())
    .fetch_all(pool)
    .await?;

    let reviews = sqlx::query_as::<_, Review>(
        "SELECT * FROM reviews WHERE product_id = ANY($1) AND deleted_at IS NULL ORDER BY id",
    )
    .bind(ids.as_slice())
    .fetch_all(pool)
    .await?;

    let mut categories_by_product: HashMap<ProductId, Vec<Category>> = HashMap::new();
    for row in links {
        categories_by_product
            .entry(row.product_id)
            .or_default()
            .push(row.category);
    }

    let mut reviews_by_product: HashMap<ProductId, Vec<Review>> = HashMap::new();
    for review in reviews {
        reviews_by_product
            .entry(review.product_id)
            .or_default()
            .push(review);
    }

    for product in products.iter_mut() {
        let Some(id) = product.id else { continue };
        product.categories = categories_by_product.remove(&id).unwrap_or_default();
        product.reviews = reviews_by_product.remove(&id).unwrap_or_default();
    }

    Ok(())
}
