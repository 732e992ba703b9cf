//! Domain models.
//!
//! Each model maps one table and implements [`crate::db::Entity`].
//! Models carry an optional identity (`None` until first persisted) and the
//! shared [`Timestamps`] audit block.

pub mod address;
pub mod category;
pub mod order;
pub mod payment;
pub mod product;
pub mod review;
pub mod user;

use chrono::{DateTime, Utc};

pub use address::Address;
pub use category::{Category, ProductCategory};
pub use order::{Order, OrderItem};
pub use payment::Payment;
pub use product::Product;
pub use review::Review;
pub use user::User;

/// Audit columns present on every table.
///
/// All three are `None` on a record that has not been persisted yet.
#[derive(Debug, Clone, Default, PartialEq, Eq, sqlx::FromRow)]
pub struct Timestamps {
    /// When the row was inserted.
    pub created_at: Option<DateTime<Utc>>,
    /// When the row was last written.
    pub updated_at: Option<DateTime<Utc>>,
    /// When the row was soft-deleted.
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Timestamps {
    /// Whether the row has been soft-deleted.
    #[must_use]
    pub const fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}
