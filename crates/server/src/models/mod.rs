//! Domain models for the order desk.
//!
//! Typed records built once at the repository boundary. Nothing downstream
//! of the `db` module handles raw rows.

pub mod message;
pub mod order;
pub mod session;
pub mod user;

pub use message::Message;
pub use order::{DEFAULT_ORDER_STATUS, NewOrder, Order, OrderSummary};
pub use session::{CurrentUser, keys as session_keys};
pub use user::User;
