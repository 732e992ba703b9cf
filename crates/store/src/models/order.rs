//! Order and order item domain types.

use std::future::Future;

use commerce_core::{AddressId, OrderId, OrderItemId, OrderStatus, PaymentStatus, ProductId, UserId};
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};

use super::Timestamps;
use crate::db::{Entity, EntityQuery, RepositoryError};

/// An order placed by a user.
///
/// The order and its items are one aggregate: saving an order that carries
/// items replaces the stored items in the same transaction. Saving an order
/// with an empty `items` list leaves stored items untouched.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Order {
    /// Unique order ID.
    pub id: Option<OrderId>,
    /// Customer.
    pub user_id: UserId,
    /// Human-facing order number (unique).
    pub order_number: String,
    /// Sum of item line totals.
    pub sub_total_amount: Decimal,
    /// Sum of item taxes.
    pub tax_amount: Decimal,
    /// `sub_total_amount + tax_amount`.
    pub total_amount: Decimal,
    /// Fulfillment status.
    pub status: OrderStatus,
    /// Payment status.
    pub payment_status: PaymentStatus,
    /// Where to ship.
    pub shipping_address_id: AddressId,
    /// Where to bill.
    pub billing_address_id: AddressId,
    /// Line items, in insertion order.
    #[sqlx(skip)]
    pub items: Vec<OrderItem>,
    /// Audit columns.
    #[sqlx(flatten)]
    pub timestamps: Timestamps,
}

impl Order {
    /// Create an unsaved pending order with zero totals.
    #[must_use]
    pub fn new(
        user_id: UserId,
        order_number: impl Into<String>,
        shipping_address_id: AddressId,
        billing_address_id: AddressId,
    ) -> Self {
        Self {
            id: None,
            user_id,
            order_number: order_number.into(),
            sub_total_amount: Decimal::ZERO,
            tax_amount: Decimal::ZERO,
            total_amount: Decimal::ZERO,
            status: OrderStatus::default(),
            payment_status: PaymentStatus::default(),
            shipping_address_id,
            billing_address_id,
            items: Vec::new(),
            timestamps: Timestamps::default(),
        }
    }

    /// Set the three amounts from the current items.
    pub fn recalculate_totals(&mut self) {
        let (sub_total, tax) = self.item_totals();
        self.sub_total_amount = sub_total;
        self.tax_amount = tax;
        self.total_amount = sub_total + tax;
    }

    fn item_totals(&self) -> (Decimal, Decimal) {
        self.items.iter().fold((Decimal::ZERO, Decimal::ZERO), |(sub, tax), item| {
            (sub + item.line_total(), tax + item.tax_amount)
        })
    }

    /// Check items and amounts against each other.
    ///
    /// An order without items only needs `total = subtotal + tax`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Validation` if an item is invalid or the
    /// amounts do not add up. Amounts are compared at two decimal places.
    pub fn validate(&self) -> Result<(), RepositoryError> {
        if self.items.is_empty() {
            return self.validate_total();
        }
        self.validate_against_items()
    }

    /// Like [`Order::validate`], but an empty item list must come with zero
    /// subtotal and tax.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Validation` if an item is invalid or the
    /// amounts do not add up.
    pub fn validate_against_items(&self) -> Result<(), RepositoryError> {
        self.validate_total()?;

        for item in &self.items {
            item.validate()?;
        }

        let (sub_total, tax) = self.item_totals();
        if sub_total.round_dp(2) != self.sub_total_amount.round_dp(2) {
            return Err(RepositoryError::Validation(format!(
                "subtotal {} does not match item total {sub_total}",
                self.sub_total_amount
            )));
        }
        if tax.round_dp(2) != self.tax_amount.round_dp(2) {
            return Err(RepositoryError::Validation(format!(
                "tax {} does not match item tax {tax}",
                self.tax_amount
            )));
        }

        Ok(())
    }

    fn validate_total(&self) -> Result<(), RepositoryError> {
        if self.total_amount.round_dp(2) != (self.sub_total_amount + self.tax_amount).round_dp(2) {
            return Err(RepositoryError::Validation(format!(
                "total {} does not equal subtotal {} plus tax {}",
                self.total_amount, self.sub_total_amount, self.tax_amount
            )));
        }
        Ok(())
    }
}

impl Entity for Order {
    type Id = OrderId;

    const TABLE: &'static str = "orders";
    const COLUMNS: &'static [&'static str] = &[
        "user_id",
        "order_number",
        "sub_total_amount",
        "tax_amount",
        "total_amount",
        "status",
        "payment_status",
        "shipping_address_id",
        "billing_address_id",
    ];

    fn id(&self) -> Option<OrderId> {
        self.id
    }

    fn bind_columns<'q>(&'q self, query: EntityQuery<'q, Self>) -> EntityQuery<'q, Self> {
        query
            .bind(self.user_id)
            .bind(&self.order_number)
            .bind(self.sub_total_amount)
            .bind(self.tax_amount)
            .bind(self.total_amount)
            .bind(self.status)
            .bind(self.payment_status)
            .bind(self.shipping_address_id)
            .bind(self.billing_address_id)
    }

    fn before_insert(&mut self) -> Result<(), RepositoryError> {
        self.validate()
    }

    fn before_update(&mut self, _stored: &Self) -> Result<(), RepositoryError> {
        self.validate()
    }

    fn after_save(
        conn: &mut PgConnection,
        saved: &mut Self,
        input: Self,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send {
        crate::db::orders::replace_items(conn, saved, input.items)
    }

    fn load_relations(
        pool: &PgPool,
        entities: &mut [Self],
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send {
        crate::db::orders::load_items(pool, entities)
    }
}

/// A line item: a snapshot of product, quantity and price at order time.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct OrderItem {
    /// Unique item ID.
    pub id: Option<OrderItemId>,
    /// Owning order; assigned when the order is saved.
    pub order_id: Option<OrderId>,
    /// Ordered product.
    pub product_id: ProductId,
    /// Units ordered (positive).
    pub quantity: i32,
    /// Price per unit at order time.
    pub unit_price: Decimal,
    /// Tax for the whole line.
    pub tax_amount: Decimal,
    /// Audit columns.
    #[sqlx(flatten)]
    pub timestamps: Timestamps,
}

impl OrderItem {
    /// Create an unsaved item with no tax.
    #[must_use]
    pub fn new(product_id: ProductId, quantity: i32, unit_price: Decimal) -> Self {
        Self {
            id: None,
            order_id: None,
            product_id,
            quantity,
            unit_price,
            tax_amount: Decimal::ZERO,
            timestamps: Timestamps::default(),
        }
    }

    /// `quantity * unit_price`.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }

    fn validate(&self) -> Result<(), RepositoryError> {
        if self.quantity <= 0 {
            return Err(RepositoryError::Validation(format!(
                "quantity must be positive, got {}",
                self.quantity
            )));
        }
        if self.unit_price.is_sign_negative() {
            return Err(RepositoryError::Validation(format!(
                "unit price must not be negative, got {}",
                self.unit_price
            )));
        }
        Ok(())
    }
}

impl Entity for OrderItem {
    type Id = OrderItemId;

    const TABLE: &'static str = "order_items";
    const COLUMNS: &'static [&'static str] =
        &["order_id", "product_id", "quantity", "unit_price", "tax_amount"];

    fn id(&self) -> Option<OrderItemId> {
        self.id
    }

    fn bind_columns<'q>(&'q self, query: EntityQuery<'q, Self>) -> EntityQuery<'q, Self> {
        query
            .bind(self.order_id)
            .bind(self.product_id)
            .bind(self.quantity)
            .bind(self.unit_price)
            .bind(self.tax_amount)
    }

    fn before_insert(&mut self) -> Result<(), RepositoryError> {
        if self.order_id.is_none() {
            return Err(RepositoryError::Validation(
                "order item must belong to an order".to_owned(),
            ));
        }
        self.validate()
    }

    fn before_update(&mut self, stored: &Self) -> Result<(), RepositoryError> {
        if self.order_id != stored.order_id {
            return Err(RepositoryError::Validation(
                "order items cannot move between orders".to_owned(),
            ));
        }
        self.validate()
    }

    fn after_save(
        conn: &mut PgConnection,
        saved: &mut Self,
        _input: Self,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send {
        crate::db::orders::revalidate_order(conn, saved.order_id)
    }

    fn after_delete(
        conn: &mut PgConnection,
        deleted: &Self,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send {
        crate::db::orders::revalidate_order(conn, deleted.order_id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn order_with_items() -> Order {
        let mut order = Order::new(UserId::new(1), "ORD-1", AddressId::new(1), AddressId::new(2));
        let mut first = OrderItem::new(ProductId::new(10), 2, Decimal::new(1999, 2));
        first.tax_amount = Decimal::new(320, 2);
        let second = OrderItem::new(ProductId::new(11), 1, Decimal::new(500, 2));
        order.items = vec![first, second];
        order
    }

    #[test]
    fn test_recalculate_totals() {
        let mut order = order_with_items();
        order.recalculate_totals();

        assert_eq!(order.sub_total_amount, Decimal::new(4498, 2));
        assert_eq!(order.tax_amount, Decimal::new(320, 2));
        assert_eq!(order.total_amount, Decimal::new(4818, 2));
        assert!(order.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_mismatched_subtotal() {
        let mut order = order_with_items();
        order.recalculate_totals();
        order.sub_total_amount = Decimal::new(100, 2);
        order.total_amount = order.sub_total_amount + order.tax_amount;

        assert!(matches!(order.validate(), Err(RepositoryError::Validation(_))));
    }

    #[test]
    fn test_validate_rejects_inconsistent_total() {
        let mut order = order_with_items();
        order.recalculate_totals();
        order.total_amount += Decimal::ONE;

        assert!(matches!(order.before_insert(), Err(RepositoryError::Validation(_))));
    }

    #[test]
    fn test_validate_without_items_checks_total_only() {
        let mut order = Order::new(UserId::new(1), "ORD-2", AddressId::new(1), AddressId::new(1));
        order.sub_total_amount = Decimal::new(1000, 2);
        order.total_amount = Decimal::new(1000, 2);
        assert!(order.validate().is_ok());
    }

    #[test]
    fn test_item_rejects_non_positive_quantity() {
        let mut item = OrderItem::new(ProductId::new(1), 0, Decimal::ONE);
        item.order_id = Some(OrderId::new(1));
        assert!(matches!(item.before_insert(), Err(RepositoryError::Validation(_))));
    }

    #[test]
    fn test_item_rejects_negative_price() {
        let mut item = OrderItem::new(ProductId::new(1), 1, Decimal::NEGATIVE_ONE);
        item.order_id = Some(OrderId::new(1));
        assert!(matches!(item.before_insert(), Err(RepositoryError::Validation(_))));
    }

    #[test]
    fn test_item_requires_order() {
        let mut item = OrderItem::new(ProductId::new(1), 1, Decimal::ONE);
        assert!(matches!(item.before_insert(), Err(RepositoryError::Validation(_))));

        item.order_id = Some(OrderId::new(3));
        assert!(item.before_insert().is_ok());
    }

    #[test]
    fn test_empty_items_must_have_zero_amounts_when_checked_strictly() {
        let mut order = Order::new(UserId::new(1), "ORD-3", AddressId::new(1), AddressId::new(1));
        order.sub_total_amount = Decimal::new(2000, 2);
        order.total_amount = Decimal::new(2000, 2);

        assert!(order.validate().is_ok());
        assert!(matches!(
            order.validate_against_items(),
            Err(RepositoryError::Validation(_))
        ));

        order.sub_total_amount = Decimal::ZERO;
        order.total_amount = Decimal::ZERO;
        assert!(order.validate_against_items().is_ok());
    }

    #[test]
    fn test_item_cannot_move_between_orders() {
        let mut stored = OrderItem::new(ProductId::new(1), 1, Decimal::ONE);
        stored.id = Some(OrderItemId::new(5));
        stored.order_id = Some(OrderId::new(1));

        let mut moved = stored.clone();
        moved.order_id = Some(OrderId::new(2));
        assert!(matches!(
            moved.before_update(&stored),
            Err(RepositoryError::Validation(_))
        ));

        let mut same = stored.clone();
        same.quantity = 3;
        assert!(same.before_update(&stored).is_ok());
    }

    #[test]
    fn test_line_total() {
        let item = OrderItem::new(ProductId::new(1), 3, Decimal::new(250, 2));
        assert_eq!(item.line_total(), Decimal::new(750, 2));
    }
}
