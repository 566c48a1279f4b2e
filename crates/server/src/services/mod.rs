//! Business logic services.
//!
//! # Services
//!
//! - `access` - Who may list, create, view and post to orders
//! - `auth` - Password login, admin bootstrap, account creation
//! - `chat` - Per-order message threads
//! - `orders` - Order listing, creation and lookup

pub mod access;
pub mod auth;
pub mod chat;
pub mod orders;

pub use auth::{AuthError, AuthService};
pub use chat::{ChatError, ChatService, Thread};
pub use orders::{OrderDraft, OrderError, OrderService};
