//! User domain types.

use pedidos_core::{Email, Role, UserId};

/// An account that can log in (domain type).
///
/// The password hash never leaves the credential store, so it is not part
/// of this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Display name shown as message author and order creator.
    pub name: String,
    /// Login email (unique, normalized).
    pub email: Email,
    /// Permission level.
    pub role: Role,
}
