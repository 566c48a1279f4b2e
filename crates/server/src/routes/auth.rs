//! Authentication route handlers.
//!
//! Login with email and password, logout, and the root redirect.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::{info, warn};

use crate::error::{AppError, clear_sentry_user};
use crate::filters;
use crate::middleware::{OptionalAuth, clear_session, set_current_user};
use crate::models::CurrentUser;
use crate::services::{AuthError, AuthService};
use crate::state::AppState;

/// Message shown for any failed login.
const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub error: Option<&'static str>,
    pub email: String,
}

/// Send visitors to the dashboard or the login page.
pub async fn index(OptionalAuth(user): OptionalAuth) -> Redirect {
    if user.is_some() {
        Redirect::to("/dashboard")
    } else {
        Redirect::to("/login")
    }
}

/// Display the login page.
pub async fn login_page(OptionalAuth(user): OptionalAuth) -> Response {
    if user.is_some() {
        return Redirect::to("/dashboard").into_response();
    }

    LoginTemplate {
        error: None,
        email: String::new(),
    }
    .into_response()
}

/// Handle login form submission.
///
/// Any failure re-renders the form with the same generic message.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let auth = AuthService::new(state.pool());

    let user = match auth.verify_login(&form.email, &form.password).await {
        Ok(user) => user,
        Err(AuthError::InvalidCredentials) => {
            warn!("Failed login attempt");
            let page = LoginTemplate {
                error: Some(INVALID_CREDENTIALS),
                email: form.email.trim().to_string(),
            };
            return Ok((StatusCode::UNAUTHORIZED, page).into_response());
        }
        Err(e) => return Err(e.into()),
    };

    let current = CurrentUser::from(&user);
    set_current_user(&session, &current)
        .await
        .map_err(|e| AppError::Internal(format!("failed to set session: {e}")))?;

    info!(user_id = %current.id, role = %current.role, "User logged in");
    Ok(Redirect::to("/dashboard").into_response())
}

/// Log out and return to the login page.
pub async fn logout(session: Session) -> Result<Redirect, AppError> {
    clear_session(&session)
        .await
        .map_err(|e| AppError::Internal(format!("failed to clear session: {e}")))?;
    clear_sentry_user();

    Ok(Redirect::to("/login"))
}
