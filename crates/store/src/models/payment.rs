//! Payment domain type.

use chrono::{DateTime, Utc};
use commerce_core::{
    CurrencyCode, OrderId, PaymentGateway, PaymentId, PaymentMethod, PaymentStatus, Price,
};
use rust_decimal::Decimal;

use super::Timestamps;
use crate::db::{Entity, EntityQuery};

/// A payment against an order.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Payment {
    /// Unique payment ID.
    pub id: Option<PaymentId>,
    /// Paid order.
    pub order_id: OrderId,
    /// Amount in `currency`.
    pub amount: Decimal,
    /// Processing status.
    pub status: PaymentStatus,
    /// Processor reference (unique when present).
    pub gateway_transaction_id: Option<String>,
    /// Raw processor response.
    pub gateway_response: Option<String>,
    /// How the customer paid.
    pub payment_method: PaymentMethod,
    /// Which processor handled it.
    pub payment_gateway: PaymentGateway,
    /// Currency of `amount`.
    pub currency: CurrencyCode,
    /// When the funds were received.
    pub paid_at: Option<DateTime<Utc>>,
    /// Audit columns.
    #[sqlx(flatten)]
    pub timestamps: Timestamps,
}

impl Payment {
    /// Create an unsaved pending payment in USD.
    #[must_use]
    pub fn new(
        order_id: OrderId,
        amount: Decimal,
        payment_method: PaymentMethod,
        payment_gateway: PaymentGateway,
    ) -> Self {
        Self {
            id: None,
            order_id,
            amount,
            status: PaymentStatus::default(),
            gateway_transaction_id: None,
            gateway_response: None,
            payment_method,
            payment_gateway,
            currency: CurrencyCode::default(),
            paid_at: None,
            timestamps: Timestamps::default(),
        }
    }

    /// Amount with its currency.
    #[must_use]
    pub const fn price(&self) -> Price {
        Price::new(self.amount, self.currency)
    }
}

impl Entity for Payment {
    type Id = PaymentId;

    const TABLE: &'static str = "payments";
    const COLUMNS: &'static [&'static str] = &[
        "order_id",
        "amount",
        "status",
        "gateway_transaction_id",
        "gateway_response",
        "payment_method",
        "payment_gateway",
        "currency",
        "paid_at",
    ];

    fn id(&self) -> Option<PaymentId> {
        self.id
    }

    fn bind_columns<'q>(&'q self, query: EntityQuery<'q, Self>) -> EntityQuery<'q, Self> {
        query
            .bind(self.order_id)
            .bind(self.amount)
            .bind(self.status)
            .bind(&self.gateway_transaction_id)
            .bind(&self.gateway_response)
            .bind(self.payment_method)
            .bind(self.payment_gateway)
            .bind(self.currency)
            .bind(self.paid_at)
    }
}
