//! Address lookups and default-address handling.

use commerce_core::{AddressId, UserId};

use super::{Repository, RepositoryError, map_db_error};
use crate::models::Address;

/// Repository for addresses.
pub type AddressRepository<'a> = Repository<'a, Address>;

impl Repository<'_, Address> {
    /// Live addresses of a user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_user_id(&self, user_id: UserId) -> Result<Vec<Address>, RepositoryError> {
        self.find_by("user_id", user_id).await
    }

    /// Make `address_id` the user's only default address.
    ///
    /// Clearing the previous default and setting the new one happen in one
    /// transaction, so the partial unique index on live defaults never trips.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the address is not a live address of this user.
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn set_default(
        &self,
        user_id: UserId,
        address_id: AddressId,
    ) -> Result<Address, RepositoryError> {
        let mut tx = self.pool().begin().await?;

        sqlx::query(
            r"
            UPDATE addresses
            SET is_default = FALSE, updated_at = now()
            WHERE user_id = $1 AND is_default AND id <> $2 AND deleted_at IS NULL
            ",
        )
        .bind(user_id)
        .bind(address_id)
        .execute(&mut *tx)
        .await?;

        let address = sqlx::query_as::<_, Address>(
            r"
            UPDATE addresses
            SET is_default = TRUE, updated_at = now()
            WHERE id = $1 AND user_id = $2 AND deleted_at IS NULL
            RETURNING *
            ",
        )
        .bind(address_id)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_db_error)?
        .ok_or(RepositoryError::NotFound)?;

        tx.commit().await?;

        tracing::debug!(%user_id, %address_id, "Set default address");
        Ok(address)
    }
}
