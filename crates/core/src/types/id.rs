//! Typed primary keys.
//!
//! Every table uses a `SERIAL` key. Wrapping each one in its own type keeps
//! an `OrderId` from being passed where a `UserId` is expected.

macro_rules! entity_id {
    ($($(#[$meta:meta])* $name:ident;)+) => {$(
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize,
        )]
        #[serde(transparent)]
        #[cfg_attr(feature = "postgres", derive(::sqlx::Type), sqlx(transparent))]
        pub struct $name(i32);

        impl $name {
            /// Wrap a raw key.
            #[must_use]
            pub const fn new(id: i32) -> Self {
                Self(id)
            }

            /// The raw key.
            #[must_use]
            pub const fn as_i32(&self) -> i32 {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                ::core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<i32> for $name {
            fn from(id: i32) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    )+};
}

entity_id! {
    /// `users.id`
    UserId;
    /// `addresses.id`
    AddressId;
    /// `products.id`
    ProductId;
    /// `categories.id`
    CategoryId;
    /// `product_categories.id`
    ProductCategoryId;
    /// `reviews.id`
    ReviewId;
    /// `orders.id`
    OrderId;
    /// `order_items.id`
    OrderItemId;
    /// `payments.id`
    PaymentId;
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_id_conversions() {
        let id = OrderId::new(42);
        assert_eq!(id.as_i32(), 42);
        assert_eq!(i32::from(id), 42);
        assert_eq!(OrderId::from(42), id);
    }

    #[test]
    fn test_id_display() {
        assert_eq!(ProductId::new(7).to_string(), "7");
    }

    #[test]
    fn test_ids_sort_by_key() {
        let mut ids = vec![CategoryId::new(9), CategoryId::new(2), CategoryId::new(5)];
        ids.sort();
        assert_eq!(ids, vec![CategoryId::new(2), CategoryId::new(5), CategoryId::new(9)]);
    }

    #[test]
    fn test_id_serializes_transparently() {
        let json = serde_json::to_string(&CategoryId::new(3)).unwrap();
        assert_eq!(json, "3");

        let parsed: CategoryId = serde_json::from_str("3").unwrap();
        assert_eq!(parsed, CategoryId::new(3));
    }
}
