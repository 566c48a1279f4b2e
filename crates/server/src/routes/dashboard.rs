//! Dashboard route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::response::IntoResponse;

use crate::filters;
use crate::middleware::RequireAuth;
use crate::models::CurrentUser;
use crate::services::access;

/// Dashboard page template.
///
/// The order list itself is fetched by `static/app.js` from `/orders`.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub user: CurrentUser,
    pub can_create: bool,
}

/// Display the dashboard.
pub async fn show(RequireAuth(user): RequireAuth) -> impl IntoResponse {
    DashboardTemplate {
        can_create: access::can_create_order(&user),
        user,
    }
}
