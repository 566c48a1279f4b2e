//! Access policy for orders and their chat threads.
//!
//! Pure decisions over the request's [`CurrentUser`]. Admins see and touch
//! everything; other users only the orders they created.

use crate::db::OrderFilter;
use crate::models::{CurrentUser, Order};

/// Which orders `user` may list.
#[must_use]
pub const fn order_filter(user: &CurrentUser) -> OrderFilter {
    if user.is_admin() {
        OrderFilter::All
    } else {
        OrderFilter::CreatedBy(user.id)
    }
}

/// Whether `user` may create orders.
#[must_use]
pub const fn can_create_order(user: &CurrentUser) -> bool {
    user.is_admin()
}

/// Whether `user` may view `order`, its detail and its thread.
#[must_use]
pub fn can_access_order(user: &CurrentUser, order: &Order) -> bool {
    user.is_admin() || order.created_by == user.id
}

/// Whether `user` may post to `order`'s thread.
///
/// Anyone who can read a thread can write to it.
#[must_use]
pub fn can_post_message(user: &CurrentUser, order: &Order) -> bool {
    can_access_order(user, order)
}
