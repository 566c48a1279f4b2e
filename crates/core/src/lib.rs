//! Pedidos Core - Shared types library.
//!
//! This crate provides common types used across all Pedidos components:
//! - `server` - Order desk web application (orders, chat threads, sessions)
//! - `cli` - Command-line tools for migrations and user management
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access,
//! no HTTP clients. The optional `sqlite` feature adds sqlx encoding so the
//! types can be bound and decoded directly in queries.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, emails, and user roles

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
