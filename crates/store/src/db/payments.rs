//! Payment lookups.

use commerce_core::OrderId;

use super::{Repository, RepositoryError};
use crate::models::Payment;

/// Repository for payments.
pub type PaymentRepository<'a> = Repository<'a, Payment>;

impl Repository<'_, Payment> {
    /// Live payments against an order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_order_id(&self, order_id: OrderId) -> Result<Vec<Payment>, RepositoryError> {
        self.find_by("order_id", order_id).await
    }

    /// Look up a payment by its processor reference.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_transaction_id(
        &self,
        transaction_id: &str,
    ) -> Result<Option<Payment>, RepositoryError> {
        self.find_one_by("gateway_transaction_id", transaction_id.to_owned())
            .await
    }
}
