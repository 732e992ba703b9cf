//! Order and order item wire types.

use chrono::{DateTime, Utc};
use commerce_core::{AddressId, OrderId, OrderItemId, OrderStatus, PaymentStatus, ProductId, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::wire_time;
use crate::models::{Order, OrderItem, Timestamps};

/// Wire form of an [`Order`]; items travel as `order_items`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<OrderId>,
    pub user_id: UserId,
    pub order_number: String,
    #[serde(default)]
    pub sub_total_amount: Decimal,
    #[serde(default)]
    pub tax_amount: Decimal,
    #[serde(default)]
    pub total_amount: Decimal,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub payment_status: PaymentStatus,
    pub shipping_address_id: AddressId,
    pub billing_address_id: AddressId,
    #[serde(default)]
    pub order_items: Vec<OrderItemDto>,
    #[serde(default, with = "wire_time", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, with = "wire_time", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, with = "wire_time", skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Wire form of an [`OrderItem`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItemDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<OrderItemId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<OrderId>,
    pub product_id: ProductId,
    pub quantity: i32,
    pub unit_price: Decimal,
    #[serde(default)]
    pub tax_amount: Decimal,
    #[serde(default, with = "wire_time", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, with = "wire_time", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, with = "wire_time", skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl From<&Order> for OrderDto {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id,
            user_id: order.user_id,
            order_number: order.order_number.clone(),
            sub_total_amount: order.sub_total_amount,
            tax_amount: order.tax_amount,
            total_amount: order.total_amount,
            status: order.status,
            payment_status: order.payment_status,
            shipping_address_id: order.shipping_address_id,
            billing_address_id: order.billing_address_id,
            order_items: order.items.iter().map(OrderItemDto::from).collect(),
            created_at: order.timestamps.created_at,
            updated_at: order.timestamps.updated_at,
            deleted_at: order.timestamps.deleted_at,
        }
    }
}

impl From<OrderDto> for Order {
    fn from(dto: OrderDto) -> Self {
        Self {
            id: None,
            user_id: dto.user_id,
            order_number: dto.order_number,
            sub_total_amount: dto.sub_total_amount,
            tax_amount: dto.tax_amount,
            total_amount: dto.total_amount,
            status: dto.status,
            payment_status: dto.payment_status,
            shipping_address_id: dto.shipping_address_id,
            billing_address_id: dto.billing_address_id,
            items: dto.order_items.into_iter().map(OrderItem::from).collect(),
            timestamps: Timestamps::default(),
        }
    }
}

impl From<&OrderItem> for OrderItemDto {
    fn from(item: &OrderItem) -> Self {
        Self {
            id: item.id,
            order_id: item.order_id,
            product_id: item.product_id,
            quantity: item.quantity,
            unit_price: item.unit_price,
            tax_amount: item.tax_amount,
            created_at: item.timestamps.created_at,
            updated_at: item.timestamps.updated_at,
            deleted_at: item.timestamps.deleted_at,
        }
    }
}

impl From<OrderItemDto> for OrderItem {
    fn from(dto: OrderItemDto) -> Self {
        Self {
            id: None,
            order_id: dto.order_id,
            product_id: dto.product_id,
            quantity: dto.quantity,
            unit_price: dto.unit_price,
            tax_amount: dto.tax_amount,
            timestamps: Timestamps::default(),
        }
    }
}
