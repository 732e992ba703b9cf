//! Address domain type.

use commerce_core::{AddressId, UserId};

use super::Timestamps;
use crate::db::{Entity, EntityQuery};

/// A user's shipping or billing address.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Address {
    /// Unique address ID.
    pub id: Option<AddressId>,
    /// Owner.
    pub user_id: UserId,
    /// Street line.
    pub street: String,
    /// City.
    pub city: String,
    /// State or province.
    pub state: String,
    /// Postal code.
    pub postal_code: String,
    /// Country.
    pub country: String,
    /// Whether this is the user's default address (at most one live default per user).
    pub is_default: bool,
    /// Audit columns.
    #[sqlx(flatten)]
    pub timestamps: Timestamps,
}

impl Entity for Address {
    type Id = AddressId;

    const TABLE: &'static str = "addresses";
    const COLUMNS: &'static [&'static str] = &[
        "user_id",
        "street",
        "city",
        "state",
        "postal_code",
        "country",
        "is_default",
    ];

    fn id(&self) -> Option<AddressId> {
        self.id
    }

    fn bind_columns<'q>(&'q self, query: EntityQuery<'q, Self>) -> EntityQuery<'q, Self> {
        query
            .bind(self.user_id)
            .bind(&self.street)
            .bind(&self.city)
            .bind(&self.state)
            .bind(&self.postal_code)
            .bind(&self.country)
            .bind(self.is_default)
    }
}
