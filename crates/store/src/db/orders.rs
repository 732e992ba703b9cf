//! Order and order item lookups, plus the item half of the order aggregate.

use std::collections::HashMap;

use commerce_core::{OrderId, UserId};
use sqlx::{PgConnection, PgPool};

use super::repository::insert_sql;
use super::{Entity, Repository, RepositoryError, map_db_error};
use crate::models::{Order, OrderItem};

/// Repository for orders. Saving an order also writes its items.
pub type OrderRepository<'a> = Repository<'a, Order>;

/// Repository for individual order items.
///
/// Writing or deleting a single item re-checks the owning order's totals in
/// the same transaction, so a change that leaves them stale is rejected.
/// Change items by saving the order.
pub type OrderItemRepository<'a> = Repository<'a, OrderItem>;

impl Repository<'_, Order> {
    /// Live orders placed by a user, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_user_id(&self, user_id: UserId) -> Result<Vec<Order>, RepositoryError> {
        self.find_by("user_id", user_id).await
    }

    /// Get a live order by its order number.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_order_number(
        &self,
        order_number: &str,
    ) -> Result<Option<Order>, RepositoryError> {
        self.find_one_by("order_number", order_number.to_owned())
            .await
    }
}

impl Repository<'_, OrderItem> {
    /// Live items of an order, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_order_id(&self, order_id: OrderId) -> Result<Vec<OrderItem>, RepositoryError> {
        self.find_by("order_id", order_id).await
    }
}

const LIVE_ITEMS_SQL: &str =
    "SELECT * FROM order_items WHERE order_id = $1 AND deleted_at IS NULL ORDER BY id";

/// Write the items of a just-saved order.
///
/// A non-empty `items` replaces whatever the order had; an empty one leaves
/// the stored items alone, reloads them into `order` and checks the saved
/// totals against them.
pub(crate) async fn replace_items(
    conn: &mut PgConnection,
    order: &mut Order,
    items: Vec<OrderItem>,
) -> Result<(), RepositoryError> {
    let order_id = order
        .id
        .ok_or_else(|| RepositoryError::DataCorruption("saved order has no id".to_owned()))?;

    if items.is_empty() {
        order.items = sqlx::query_as::<_, OrderItem>(LIVE_ITEMS_SQL)
            .bind(order_id)
            .fetch_all(&mut *conn)
            .await?;
        return order.validate();
    }

    let removed = sqlx::query("DELETE FROM order_items WHERE order_id = $1")
        .bind(order_id)
        .execute(&mut *conn)
        .await?
        .rows_affected();

    let sql = insert_sql(OrderItem::TABLE, OrderItem::COLUMNS);
    let mut saved_items = Vec::with_capacity(items.len());
    for mut item in items {
        item.id = None;
        item.order_id = Some(order_id);
        item.before_insert()?;

        let saved = item
            .bind_columns(sqlx::query_as::<_, OrderItem>(&sql))
            .fetch_one(&mut *conn)
            .await
            .map_err(map_db_error)?;
        saved_items.push(saved);
    }

    tracing::debug!(
        %order_id,
        removed,
        inserted = saved_items.len(),
        "Replaced order items"
    );
    order.items = saved_items;
    Ok(())
}

/// Lock an order and check its totals against its live items.
///
/// Runs after a single item was written or deleted outside of an order save.
/// Unlike [`Order::validate`], an order left without items must also have
/// zero subtotal and tax.
pub(crate) async fn revalidate_order(
    conn: &mut PgConnection,
    order_id: Option<OrderId>,
) -> Result<(), RepositoryError> {
    let order_id = order_id.ok_or_else(|| {
        RepositoryError::Validation("order item must belong to an order".to_owned())
    })?;

    let mut order = sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE id = $1 FOR UPDATE")
        .bind(order_id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or(RepositoryError::NotFound)?;
    order.items = sqlx::query_as::<_, OrderItem>(LIVE_ITEMS_SQL)
        .bind(order_id)
        .fetch_all(&mut *conn)
        .await?;

    order.validate_against_items()?;
    tracing::debug!(%order_id, items = order.items.len(), "Revalidated order after item write");
    Ok(())
}

/// Load live items for a batch of orders in one query.
pub(crate) async fn load_items(pool: &PgPool, orders: &mut [Order]) -> Result<(), RepositoryError> {
    let ids: Vec<i32> = orders
        .iter()
        .filter_map(|o| o.id)
        .map(|id| id.as_i32())
        .collect();
    if ids.is_empty() {
        return Ok(());
    }

    let items = sqlx::query_as::<_, OrderItem>(
        "SELECT * FROM order_items WHERE order_id = ANY($1) AND deleted_at IS NULL ORDER BY id",
    )
    .bind(ids.as_slice())
    .fetch_all(pool)
    .await?;

    let mut items_by_order: HashMap<OrderId, Vec<OrderItem>> = HashMap::new();
    for item in items {
        if let Some(order_id) = item.order_id {
            items_by_order.entry(order_id).or_default().push(item);
        }
    }

    for order in orders.iter_mut() {
        let Some(id) = order.id else { continue };
        order.items = items_by_order.remove(&id).unwrap_or_default();
    }

    Ok(())
}
