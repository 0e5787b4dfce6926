/// Integration tests for the Shoplite API
///
/// These run against a live Postgres database and exercise the full HTTP
/// surface in-process:
/// - Product CRUD lifecycle with partial updates
/// - Order creation with product resolution and read-time expansion
/// - Signup/login with duplicate conflict and generic auth failure
/// - Bearer-token protection on the user management routes
/// - The delete-always-confirms contract

mod common;

use axum::http::StatusCode;
use common::TestContext;
use serde_json::json;
use uuid::Uuid;

/// The canonical product lifecycle: create, read, patch, delete, gone.
#[tokio::test]
async fn test_product_crud_lifecycle() {
    let ctx = TestContext::new().await.unwrap();

    // Create
    let (status, body) = ctx
        .send(
            "POST",
            "/products",
            Some(json!({ "name": "Book", "price": 10.0 })),
            false,
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["created_product"]["id"].as_str().unwrap().to_string();
    assert_eq!(body["created_product"]["name"], "Book");

    // Read back
    let (status, body) = ctx
        .send("GET", &format!("/products/{}", id), None, false)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Book");
    assert_eq!(body["price"], 10.0);
    assert_eq!(body["request"]["method"], "GET");

    // Patch the price
    let (status, _) = ctx
        .send(
            "PATCH",
            &format!("/products/{}", id),
            Some(json!([{ "propName": "price", "value": 12.0 }])),
            false,
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = ctx
        .send("GET", &format!("/products/{}", id), None, false)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["price"], 12.0);

    // Delete, then the read misses
    let (status, _) = ctx
        .send("DELETE", &format!("/products/{}", id), None, false)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = ctx
        .send("GET", &format!("/products/{}", id), None, false)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "not_found");

    ctx.cleanup().await.unwrap();
}

/// Listing includes created products with hypermedia links.
#[tokio::test]
async fn test_product_listing_projection() {
    let ctx = TestContext::new().await.unwrap();

    let (_, body) = ctx
        .send(
            "POST",
            "/products",
            Some(json!({ "name": "Lamp", "price": 25.5, "image": "/uploads/lamp.png" })),
            false,
        )
        .await;
    let id = body["created_product"]["id"].as_str().unwrap().to_string();

    let (status, body) = ctx.send("GET", "/products", None, false).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["count"].as_u64().unwrap() >= 1);

    let listed = body["products"]
        .as_array()
        .unwrap()
        .iter()
        .find(|p| p["id"] == id.as_str())
        .expect("Created product should be listed");
    assert_eq!(listed["image"], "/uploads/lamp.png");
    assert_eq!(listed["request"]["url"], format!("/products/{}", id));

    ctx.send("DELETE", &format!("/products/{}", id), None, false)
        .await;
    ctx.cleanup().await.unwrap();
}

/// Unknown propName in a patch body is rejected before any write.
#[tokio::test]
async fn test_patch_unknown_field_rejected() {
    let ctx = TestContext::new().await.unwrap();

    let (_, body) = ctx
        .send(
            "POST",
            "/products",
            Some(json!({ "name": "Chair", "price": 40.0 })),
            false,
        )
        .await;
    let id = body["created_product"]["id"].as_str().unwrap().to_string();

    let (status, body) = ctx
        .send(
            "PATCH",
            &format!("/products/{}", id),
            Some(json!([{ "propName": "color", "value": "red" }])),
            false,
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "validation_error");

    // Nothing changed
    let (_, body) = ctx
        .send("GET", &format!("/products/{}", id), None, false)
        .await;
    assert_eq!(body["name"], "Chair");
    assert_eq!(body["price"], 40.0);

    ctx.send("DELETE", &format!("/products/{}", id), None, false)
        .await;
    ctx.cleanup().await.unwrap();
}

/// Negative price is rejected at validation, before storage.
#[tokio::test]
async fn test_create_product_negative_price_rejected() {
    let ctx = TestContext::new().await.unwrap();

    let (status, body) = ctx
        .send(
            "POST",
            "/products",
            Some(json!({ "name": "Freebie", "price": -1.0 })),
            false,
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "validation_error");

    ctx.cleanup().await.unwrap();
}

/// Order creation resolves the product first and expands it on reads;
/// deleting the product afterwards leaves the order dangling with a null
/// product.
#[tokio::test]
async fn test_order_create_expand_and_dangle() {
    let ctx = TestContext::new().await.unwrap();

    let (_, body) = ctx
        .send(
            "POST",
            "/products",
            Some(json!({ "name": "Mug", "price": 8.0 })),
            false,
        )
        .await;
    let product_id = body["created_product"]["id"].as_str().unwrap().to_string();

    let (status, body) = ctx
        .send(
            "POST",
            "/orders",
            Some(json!({ "productId": product_id, "quantity": 2 })),
            false,
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["created_order"]["quantity"], 2);
    let order_id = body["created_order"]["id"].as_str().unwrap().to_string();

    // Read with the product expanded inline
    let (status, body) = ctx
        .send("GET", &format!("/orders/{}", order_id), None, false)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["product"]["name"], "Mug");
    assert_eq!(body["product"]["price"], 8.0);

    // Delete the product: no cascade, the order dangles
    let (status, _) = ctx
        .send("DELETE", &format!("/products/{}", product_id), None, false)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = ctx
        .send("GET", &format!("/orders/{}", order_id), None, false)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["product"].is_null());

    ctx.send("DELETE", &format!("/orders/{}", order_id), None, false)
        .await;
    ctx.cleanup().await.unwrap();
}

/// A syntactically invalid product id fails fast with 404.
#[tokio::test]
async fn test_order_invalid_product_id() {
    let ctx = TestContext::new().await.unwrap();

    let (status, body) = ctx
        .send(
            "POST",
            "/orders",
            Some(json!({ "productId": "not-a-valid-id", "quantity": 1 })),
            false,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "not_found");

    ctx.cleanup().await.unwrap();
}

/// A well-formed id with no matching product fails with 404 and persists
/// nothing.
#[tokio::test]
async fn test_order_missing_product() {
    let ctx = TestContext::new().await.unwrap();

    let ghost_id = Uuid::new_v4();
    let (status, body) = ctx
        .send(
            "POST",
            "/orders",
            Some(json!({ "productId": ghost_id.to_string(), "quantity": 1 })),
            false,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["message"], "Product not found");

    // No order was written for that reference
    let (count,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM orders WHERE product_id = $1")
            .bind(ghost_id)
            .fetch_one(&ctx.db)
            .await
            .unwrap();
    assert_eq!(count, 0);

    ctx.cleanup().await.unwrap();
}

/// Signup creates exactly one entry per email; a duplicate yields 409 and
/// writes nothing.
#[tokio::test]
async fn test_signup_duplicate_conflict() {
    let ctx = TestContext::new().await.unwrap();
    let email = format!("dup-{}@example.com", Uuid::new_v4());

    let (status, _) = ctx
        .send(
            "POST",
            "/user/signup",
            Some(json!({ "email": email, "password": "hunter2!" })),
            false,
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = ctx
        .send(
            "POST",
            "/user/signup",
            Some(json!({ "email": email, "password": "different!" })),
            false,
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "conflict");

    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE email = $1")
        .bind(&email)
        .fetch_one(&ctx.db)
        .await
        .unwrap();
    assert_eq!(count, 1);

    sqlx::query("DELETE FROM users WHERE email = $1")
        .bind(&email)
        .execute(&ctx.db)
        .await
        .unwrap();
    ctx.cleanup().await.unwrap();
}

/// Login returns a verifiable 1-hour token; unknown email and wrong
/// password both fail with the same generic 401.
#[tokio::test]
async fn test_login_roundtrip_and_generic_failure() {
    let ctx = TestContext::new().await.unwrap();
    let email = format!("login-{}@example.com", Uuid::new_v4());

    ctx.send(
        "POST",
        "/user/signup",
        Some(json!({ "email": email, "password": "hunter2!" })),
        false,
    )
    .await;

    let (status, body) = ctx
        .send(
            "POST",
            "/user/login",
            Some(json!({ "email": email, "password": "hunter2!" })),
            false,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let token = body["token"].as_str().unwrap();
    assert!(!token.is_empty());

    // Wrong password and unknown email are indistinguishable
    let (status, body) = ctx
        .send(
            "POST",
            "/user/login",
            Some(json!({ "email": email, "password": "wrong-password" })),
            false,
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let wrong_password_message = body["error"]["message"].clone();

    let (status, body) = ctx
        .send(
            "POST",
            "/user/login",
            Some(json!({
                "email": format!("nobody-{}@example.com", Uuid::new_v4()),
                "password": "hunter2!"
            })),
            false,
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["message"], wrong_password_message);

    sqlx::query("DELETE FROM users WHERE email = $1")
        .bind(&email)
        .execute(&ctx.db)
        .await
        .unwrap();
    ctx.cleanup().await.unwrap();
}

/// The user management routes require a valid bearer token.
#[tokio::test]
async fn test_user_management_requires_token() {
    let ctx = TestContext::new().await.unwrap();

    let (status, body) = ctx.send("GET", "/user/users", None, false).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "unauthorized");

    let (status, body) = ctx.send("GET", "/user/users", None, true).await;
    assert_eq!(status, StatusCode::OK);

    // Projection never includes password hashes
    let listed = body["users"]
        .as_array()
        .unwrap()
        .iter()
        .find(|u| u["id"] == ctx.user.id.to_string())
        .expect("Test user should be listed");
    assert!(listed.get("password_hash").is_none());

    ctx.cleanup().await.unwrap();
}

/// Deleting a nonexistent id on any collection still confirms with 200.
/// This asserts the literal specified behavior, not strict idempotence.
#[tokio::test]
async fn test_delete_nonexistent_still_confirms() {
    let ctx = TestContext::new().await.unwrap();
    let ghost = Uuid::new_v4();

    let (status, body) = ctx
        .send("DELETE", &format!("/products/{}", ghost), None, false)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Product deleted");

    let (status, body) = ctx
        .send("DELETE", &format!("/orders/{}", ghost), None, false)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Order deleted");

    let (status, body) = ctx
        .send("DELETE", &format!("/user/{}", ghost), None, true)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "User deleted");

    ctx.cleanup().await.unwrap();
}

/// Unmatched routes return structured JSON 404s.
#[tokio::test]
async fn test_unmatched_route_json_404() {
    let ctx = TestContext::new().await.unwrap();

    let (status, body) = ctx.send("GET", "/no/such/route", None, false).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "not_found");

    ctx.cleanup().await.unwrap();
}

/// Health reports database connectivity.
#[tokio::test]
async fn test_health_check() {
    let ctx = TestContext::new().await.unwrap();

    let (status, body) = ctx.send("GET", "/health", None, false).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "connected");

    ctx.cleanup().await.unwrap();
}
