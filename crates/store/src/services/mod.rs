//! Services working in wire types on top of the repositories.

mod category;
mod error;
mod users;

pub use category::CategoryService;
pub use error::ServiceError;
pub use users::{MIN_PASSWORD_LENGTH, UserService};
