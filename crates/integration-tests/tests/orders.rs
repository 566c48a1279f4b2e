//! Order listing, creation and access control over HTTP.

#![allow(clippy::unwrap_used)]

use pedidos_core::Role;
use pedidos_integration_tests::TestContext;
use reqwest::StatusCode;
use serde_json::{Value, json};

async fn order_count(ctx: &TestContext) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM orders")
        .fetch_one(&ctx.pool)
        .await
        .unwrap()
}

#[tokio::test]
async fn admin_creates_order_from_json_and_form() {
    let ctx = TestContext::new().await;
    let admin = ctx.login_admin().await;

    let first = ctx.create_order(&admin, "Acme", "3x widget").await;

    let response = admin
        .post(ctx.url("/orders/new"))
        .form(&[("client", "Globex"), ("items", "1x gizmo"), ("notes", "rush")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    let second = body["order_id"].as_i64().unwrap();
    assert!(second > first);

    let orders: Vec<Value> = admin
        .get(ctx.url("/orders"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(orders.len(), 2);
    assert_eq!(orders[0]["id"], second);
    assert_eq!(orders[0]["client"], "Globex");
    assert_eq!(orders[0]["notes"], "rush");
    assert_eq!(orders[0]["creator_name"], "Admin");
    assert_eq!(orders[1]["id"], first);
    assert!(orders[1]["notes"].is_null());
}

#[tokio::test]
async fn non_admin_cannot_create_orders() {
    let ctx = TestContext::new().await;
    ctx.create_user("Maria", "maria@example.com", "pw", Role::User)
        .await;
    let maria = ctx.login("maria@example.com", "pw").await;

    let page = maria.get(ctx.url("/orders/new")).send().await.unwrap();
    assert_eq!(page.status(), StatusCode::FORBIDDEN);

    let response = maria
        .post(ctx.url("/orders/new"))
        .json(&json!({ "client": "Acme", "items": "3x widget" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(order_count(&ctx).await, 0);
}

#[tokio::test]
async fn non_admin_is_refused_before_body_is_decoded() {
    let ctx = TestContext::new().await;
    ctx.create_user("Maria", "maria@example.com", "pw", Role::User)
        .await;
    let maria = ctx.login("maria@example.com", "pw").await;

    let response = maria
        .post(ctx.url("/orders/new"))
        .json(&json!({ "client": 5 }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(order_count(&ctx).await, 0);
}

#[tokio::test]
async fn undecodable_body_from_admin_is_a_validation_error() {
    let ctx = TestContext::new().await;
    let admin = ctx.login_admin().await;

    let response = admin
        .post(ctx.url("/orders/new"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["field"], "body");
}

#[tokio::test]
async fn admin_sees_new_order_form() {
    let ctx = TestContext::new().await;
    let admin = ctx.login_admin().await;

    let page = admin.get(ctx.url("/orders/new")).send().await.unwrap();

    assert_eq!(page.status(), StatusCode::OK);
    assert!(page.text().await.unwrap().contains(r#"id="order-form""#));
}

#[tokio::test]
async fn missing_fields_are_rejected_with_field_name() {
    let ctx = TestContext::new().await;
    let admin = ctx.login_admin().await;

    let response = admin
        .post(ctx.url("/orders/new"))
        .json(&json!({ "client": "Acme", "items": "   " }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["field"], "items");
    assert_eq!(order_count(&ctx).await, 0);
}

#[tokio::test]
async fn users_only_list_their_own_orders() {
    let ctx = TestContext::new().await;
    let maria_id = ctx
        .create_user("Maria", "maria@example.com", "pw", Role::User)
        .await;
    let admin = ctx.login_admin().await;
    ctx.create_order(&admin, "Acme", "3x widget").await;

    // An order owned by Maria, inserted directly since users cannot create orders.
    sqlx::query(
        "INSERT INTO orders (client, items, created_by, created_at) VALUES ('Initech', '2x stapler', ?, '2025-03-01T10:00:00+00:00')",
    )
    .bind(maria_id.as_i64())
    .execute(&ctx.pool)
    .await
    .unwrap();

    let maria = ctx.login("maria@example.com", "pw").await;
    let mine: Vec<Value> = maria
        .get(ctx.url("/orders"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0]["client"], "Initech");
    assert_eq!(mine[0]["created_by"], maria_id.as_i64());

    let all: Vec<Value> = admin
        .get(ctx.url("/orders"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn order_detail_distinguishes_missing_from_forbidden() {
    let ctx = TestContext::new().await;
    ctx.create_user("Joao", "joao@example.com", "pw", Role::User)
        .await;
    let admin = ctx.login_admin().await;
    let id = ctx.create_order(&admin, "Acme", "3x widget").await;
    let joao = ctx.login("joao@example.com", "pw").await;

    let own = admin
        .get(ctx.url(&format!("/orders/{id}")))
        .send()
        .await
        .unwrap();
    assert_eq!(own.status(), StatusCode::OK);
    let order: Value = own.json().await.unwrap();
    assert_eq!(order["status"], "pending");

    let forbidden = joao
        .get(ctx.url(&format!("/orders/{id}")))
        .send()
        .await
        .unwrap();
    assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);

    let missing = joao.get(ctx.url("/orders/999")).send().await.unwrap();
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}
