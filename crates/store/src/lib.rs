//! Commerce store library.
//!
//! Persistence and wire mapping for the commerce backend:
//!
//! - [`models`] - Domain records (users, addresses, products, categories,
//!   orders, order items, payments, reviews)
//! - [`db`] - Generic repository over `PostgreSQL` plus typed finders per aggregate
//! - [`dto`] - JSON wire representations and model conversions
//! - [`services`] - Category and user services working in DTOs
//! - [`config`] - Database configuration (JSON file with environment fallback)
//! - [`credentials`] - Argon2id password hashing

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod credentials;
pub mod db;
pub mod dto;
pub mod models;
pub mod services;
