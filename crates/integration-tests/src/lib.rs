//! Integration tests for the Pedidos order desk.
//!
//! Each test gets its own server: a fresh in-memory `SQLite` database, the
//! real router (sessions, security headers, static files), served on an
//! ephemeral loopback port.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p pedidos-integration-tests
//! ```

#![allow(clippy::missing_panics_doc, clippy::unwrap_used)]

use std::net::SocketAddr;

use reqwest::{Client, StatusCode, redirect};
use sqlx::SqlitePool;

use pedidos_core::{Role, UserId};
use pedidos_server::app;
use pedidos_server::config::ServerConfig;
use pedidos_server::services::AuthService;

/// Email of the bootstrapped admin.
pub const ADMIN_EMAIL: &str = "admin@sys.com";

/// Password of the bootstrapped admin in tests.
pub const ADMIN_PASSWORD: &str = "123";

/// A running server and a handle to its database.
pub struct TestContext {
    pub base_url: String,
    pub pool: SqlitePool,
}

impl TestContext {
    /// Start a server with a fresh database and the bootstrapped admin.
    pub async fn new() -> Self {
        let config = ServerConfig::with_database_url("sqlite::memory:");
        let state = app::prepare(config).await.expect("prepare app");
        let pool = state.pool().clone();
        let router = app::router(state).await.expect("build router");

        let listener = tokio::net::TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
            .await
            .expect("bind ephemeral port");
        let addr = listener.local_addr().expect("local addr");

        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("server error");
        });

        Self {
            base_url: format!("http://{addr}"),
            pool,
        }
    }

    /// Absolute URL for a path on the test server.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// A client with its own cookie jar that does not follow redirects.
    #[must_use]
    pub fn client() -> Client {
        Client::builder()
            .cookie_store(true)
            .redirect(redirect::Policy::none())
            .build()
            .expect("Failed to create HTTP client")
    }

    /// Create an account directly in the database.
    pub async fn create_user(&self, name: &str, email: &str, password: &str, role: Role) -> UserId {
        AuthService::new(&self.pool)
            .create_user(name, email, password, role)
            .await
            .expect("create user")
            .id
    }

    /// Log in through the form and return the authenticated client.
    pub async fn login(&self, email: &str, password: &str) -> Client {
        let client = Self::client();
        let response = client
            .post(self.url("/login"))
            .form(&[("email", email), ("password", password)])
            .send()
            .await
            .expect("login request");

        assert_eq!(response.status(), StatusCode::SEE_OTHER, "login must succeed");
        assert_eq!(location(&response), "/dashboard");
        client
    }

    /// Log in as the bootstrapped admin.
    pub async fn login_admin(&self) -> Client {
        self.login(ADMIN_EMAIL, ADMIN_PASSWORD).await
    }

    /// Create an order as `client` and return its id.
    pub async fn create_order(&self, client: &Client, customer: &str, items: &str) -> i64 {
        let response = client
            .post(self.url("/orders/new"))
            .json(&serde_json::json!({ "client": customer, "items": items }))
            .send()
            .await
            .expect("create order request");

        assert_eq!(response.status(), StatusCode::OK);
        let body: serde_json::Value = response.json().await.expect("json body");
        assert_eq!(body["success"], true);
        body["order_id"].as_i64().expect("order_id")
    }
}

/// The `Location` header of a redirect response.
#[must_use]
pub fn location(response: &reqwest::Response) -> &str {
    response
        .headers()
        .get(reqwest::header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}
