//! Pedidos order desk server library.
//!
//! Orders created by admins for clients, a chat thread per order, and
//! session-based password login. The binary in `main.rs` adds tracing,
//! Sentry and the listener; everything else lives here so it can be
//! tested in-process.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod app;
pub mod config;
pub mod db;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
