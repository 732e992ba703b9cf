//! Commerce Core - Shared types library.
//!
//! This crate provides common types used across all commerce components:
//! - `store` - Models, repositories and DTO mapping over `PostgreSQL`
//! - `cli` - Command-line tools for migrations and management
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access.
//! Database encoding is opt-in through the `postgres` feature so the
//! types stay usable from wire-only consumers.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails, and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
