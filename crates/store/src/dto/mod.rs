//! JSON wire representations and their model conversions.
//!
//! `From<&Model> for ModelDto` builds the outbound form; `From<ModelDto> for
//! Model` builds an unsaved model from an inbound one. Identity and audit
//! fields (`id`, `created_at`, `updated_at`, `deleted_at`) are written
//! outbound and ignored inbound. `deleted_at` is written only when set, so
//! a soft-deleted record fetched by raw ID shows as deleted on the wire.
//! Nested collections convert element by element, in order.
//!
//! Money is serialized as a decimal string, enums as `snake_case` strings
//! (unknown values are rejected) and timestamps via [`wire_time`].

pub mod address;
pub mod category;
pub mod order;
pub mod payment;
pub mod product;
pub mod review;
pub mod user;
pub mod wire_time;

pub use address::AddressDto;
pub use category::CategoryDto;
pub use order::{OrderDto, OrderItemDto};
pub use payment::PaymentDto;
pub use product::ProductDto;
pub use review::ReviewDto;
pub use user::UserDto;

const fn default_true() -> bool {
    true
}
