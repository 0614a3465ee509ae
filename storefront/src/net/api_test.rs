use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde_json::{Value, json};

use super::*;
use crate::config::StorefrontConfig;
use crate::storage::MemoryStorage;

const GPU_ID: &str = "6f1c1d8e-3a55-4a4b-9d0e-1c7a2b9c0d11";
const ORDER_ID: &str = "0b8f3f8a-1d4b-4c39-8a51-4b2f5f3b6e01";

fn token(role: &str) -> String {
    let payload = URL_SAFE_NO_PAD.encode(json!({ "sub": "u-1", "role": role }).to_string());
    format!("h.{payload}.s")
}

fn gpu() -> Value {
    json!({ "id": GPU_ID, "title": "Gaming GPU", "priceCents": 79999, "stock": 75 })
}

// =============================================================================
// stub backend
// =============================================================================

#[derive(Clone, Default)]
struct Backend {
    cart: Arc<Mutex<Vec<(String, u64)>>>,
    login_auth_headers: Arc<Mutex<Vec<Option<String>>>>,
}

fn bearer(headers: &HeaderMap) -> Option<String> {
    headers.get("authorization").and_then(|v| v.to_str().ok()).map(str::to_owned)
}

fn is_user(headers: &HeaderMap) -> bool {
    let auth = bearer(headers);
    auth == Some(format!("Bearer {}", token("USER"))) || auth == Some(format!("Bearer {}", token("ADMIN")))
}

fn is_admin(headers: &HeaderMap) -> bool {
    bearer(headers) == Some(format!("Bearer {}", token("ADMIN")))
}

fn cart_json(cart: &[(String, u64)]) -> Value {
    let items: Vec<Value> = cart
        .iter()
        .map(|(_, qty)| json!({ "product": gpu(), "quantity": qty, "itemTotalCents": 79999 * qty }))
        .collect();
    let total: u64 = cart.iter().map(|(_, qty)| 79999 * qty).sum();
    json!({ "items": items, "totalCents": total })
}

async fn login(State(b): State<Backend>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    b.login_auth_headers.lock().unwrap().push(bearer(&headers));
    let role = match (body["email"].as_str(), body["password"].as_str()) {
        (Some("alice@example.com"), Some("pw")) => "USER",
        (Some("root@example.com"), Some("pw")) => "ADMIN",
        _ => return StatusCode::UNAUTHORIZED.into_response(),
    };
    Json(json!({ "accessToken": token(role), "refreshToken": "refresh" })).into_response()
}

async fn register(Json(body): Json<Value>) -> Response {
    if body["email"] == "taken@example.com" {
        return (StatusCode::BAD_REQUEST, "Email already in use").into_response();
    }
    "registered".into_response()
}

async fn product(Path(id): Path<String>) -> Response {
    if id == GPU_ID { Json(gpu()).into_response() } else { StatusCode::NOT_FOUND.into_response() }
}

async fn cart(State(b): State<Backend>, headers: HeaderMap) -> Response {
    if !is_user(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    Json(cart_json(&b.cart.lock().unwrap())).into_response()
}

async fn add_item(State(b): State<Backend>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if !is_user(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    let (Some(id), Some(qty)) = (body["productId"].as_str(), body["quantity"].as_u64()) else {
        return (StatusCode::BAD_REQUEST, "productId and quantity are required").into_response();
    };
    let mut cart = b.cart.lock().unwrap();
    cart.push((id.to_owned(), qty));
    Json(cart_json(&cart)).into_response()
}

async fn remove_item(State(b): State<Backend>, headers: HeaderMap, Path(id): Path<String>) -> Response {
    if !is_user(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    let mut cart = b.cart.lock().unwrap();
    cart.retain(|(pid, _)| *pid != id);
    Json(cart_json(&cart)).into_response()
}

async fn checkout(State(b): State<Backend>, headers: HeaderMap) -> Response {
    if !is_user(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    let mut cart = b.cart.lock().unwrap();
    if cart.is_empty() {
        return (StatusCode::BAD_REQUEST, "Cart is empty").into_response();
    }
    let total: u64 = cart.iter().map(|(_, qty)| 79999 * qty).sum();
    cart.clear();
    Json(order_json(total)).into_response()
}

fn order_json(total: u64) -> Value {
    json!({
        "id": ORDER_ID,
        "userId": "2f0e6a1c-9a7b-4b5e-8d1f-3c4b5a6d7e8f",
        "items": [{ "title": "Gaming GPU", "quantity": 1 }],
        "totalCents": total,
        "status": "completed",
        "createdAt": "2025-01-02T03:04:05Z"
    })
}

fn orphan_order_json() -> Value {
    let mut order = order_json(500);
    order["userId"] = Value::Null;
    order["userEmail"] = Value::Null;
    order
}

async fn orders(headers: HeaderMap) -> Response {
    if !is_user(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    Json(json!([order_json(79999)])).into_response()
}

async fn admin_orders(headers: HeaderMap) -> Response {
    if !is_admin(&headers) {
        return StatusCode::FORBIDDEN.into_response();
    }
    Json(json!([order_json(79999), order_json(100), orphan_order_json()])).into_response()
}

async fn create_product(headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if !is_admin(&headers) {
        return StatusCode::FORBIDDEN.into_response();
    }
    if body["title"].as_str().is_none_or(|t| t.trim().is_empty()) {
        return (StatusCode::BAD_REQUEST, "Title is required").into_response();
    }
    let mut created = body.clone();
    created["id"] = json!(GPU_ID);
    Json(created).into_response()
}

async fn delete_product(headers: HeaderMap) -> Response {
    if !is_admin(&headers) {
        return StatusCode::FORBIDDEN.into_response();
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn spawn_backend() -> (String, Backend) {
    let backend = Backend::default();
    let app = Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/register", post(register))
        .route("/api/products", get(|| async { Json(json!([gpu()])) }))
        .route("/api/products/{id}", get(product))
        .route("/api/cart", get(cart))
        .route("/api/cart/items", post(add_item))
        .route("/api/cart/items/{id}", delete(remove_item))
        .route("/api/checkout", post(checkout))
        .route("/api/orders", get(orders))
        .route("/api/admin/orders", get(admin_orders))
        .route("/api/admin/products", post(create_product))
        .route("/api/admin/products/{id}", delete(delete_product))
        .with_state(backend.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}"), backend)
}

fn storefront(base_url: &str) -> Storefront<MemoryStorage> {
    let session = Session::new(MemoryStorage::new());
    Storefront::new(ApiClient::new(&StorefrontConfig::with_base_url(base_url), session).unwrap())
}

fn gpu_id() -> Uuid {
    Uuid::parse_str(GPU_ID).unwrap()
}

// =============================================================================
// auth
// =============================================================================

#[tokio::test]
async fn login_saves_tokens_and_profile() {
    let (base, _) = spawn_backend().await;
    let shop = storefront(&base);
    let sub = shop.session().subscribe();

    let tokens = shop.login("alice@example.com", "pw").await.unwrap();

    assert_eq!(shop.session().load(), Some(tokens));
    assert_eq!(shop.session().user_email().as_deref(), Some("alice@example.com"));
    assert_eq!(shop.session().role_of().as_deref(), Some("USER"));
    assert!(sub.has_changed());
}

#[tokio::test]
async fn login_never_sends_stale_bearer() {
    let (base, backend) = spawn_backend().await;
    let shop = storefront(&base);
    shop.session()
        .save(&TokenPair { access_token: "stale".into(), refresh_token: "r".into() })
        .unwrap();

    shop.login("alice@example.com", "pw").await.unwrap();

    assert_eq!(*backend.login_auth_headers.lock().unwrap(), vec![None]);
}

#[tokio::test]
async fn login_rejected_leaves_session_empty() {
    let (base, _) = spawn_backend().await;
    let shop = storefront(&base);

    let err = shop.login("alice@example.com", "wrong").await.unwrap_err();

    assert_eq!(err.status(), Some(401));
    assert_eq!(shop.session().load(), None);
    assert_eq!(shop.session().user_email(), None);
}

#[tokio::test]
async fn register_returns_text() {
    let (base, _) = spawn_backend().await;
    let shop = storefront(&base);
    assert_eq!(shop.register("new@example.com", "pw").await.unwrap(), "registered");
    assert!(!shop.session().is_signed_in());
}

#[tokio::test]
async fn register_conflict_surfaces_server_text() {
    let (base, _) = spawn_backend().await;
    let shop = storefront(&base);
    let err = shop.register("taken@example.com", "pw").await.unwrap_err();
    assert_eq!(err.to_string(), "Email already in use");
}

#[tokio::test]
async fn logout_clears_session() {
    let (base, _) = spawn_backend().await;
    let shop = storefront(&base);
    shop.login("alice@example.com", "pw").await.unwrap();

    shop.logout().unwrap();

    assert!(!shop.session().is_signed_in());
    assert_eq!(shop.session().user_email(), None);
}

// =============================================================================
// catalogue
// =============================================================================

#[tokio::test]
async fn products_work_anonymously() {
    let (base, _) = spawn_backend().await;
    let shop = storefront(&base);
    let products = shop.products().await.unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].id, gpu_id());
}

#[tokio::test]
async fn product_by_id() {
    let (base, _) = spawn_backend().await;
    let shop = storefront(&base);
    assert_eq!(shop.product(gpu_id()).await.unwrap().title, "Gaming GPU");
}

#[tokio::test]
async fn unknown_product_is_404() {
    let (base, _) = spawn_backend().await;
    let shop = storefront(&base);
    let err = shop.product(Uuid::nil()).await.unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert_eq!(err.to_string(), "request failed with status 404");
}

// =============================================================================
// cart & orders
// =============================================================================

#[tokio::test]
async fn cart_without_session_is_unauthorized() {
    let (base, _) = spawn_backend().await;
    let shop = storefront(&base);
    assert_eq!(shop.cart().await.unwrap_err().status(), Some(401));
}

#[tokio::test]
async fn add_remove_and_checkout() {
    let (base, _) = spawn_backend().await;
    let shop = storefront(&base);
    shop.login("alice@example.com", "pw").await.unwrap();

    assert!(shop.cart().await.unwrap().is_empty());

    let cart = shop.add_to_cart(gpu_id(), 2).await.unwrap();
    assert_eq!(cart.items.len(), 1);
    assert_eq!(cart.total_cents, 159_998);

    let cart = shop.remove_from_cart(gpu_id()).await.unwrap();
    assert!(cart.is_empty());

    shop.add_to_cart(gpu_id(), 1).await.unwrap();
    let order = shop.checkout().await.unwrap();
    assert_eq!(order.total_cents, 79_999);
    assert!(shop.cart().await.unwrap().is_empty());
}

#[tokio::test]
async fn checkout_empty_cart_surfaces_message() {
    let (base, _) = spawn_backend().await;
    let shop = storefront(&base);
    shop.login("alice@example.com", "pw").await.unwrap();
    let err = shop.checkout().await.unwrap_err();
    assert_eq!(err.to_string(), "Cart is empty");
}

#[tokio::test]
async fn orders_for_signed_in_user() {
    let (base, _) = spawn_backend().await;
    let shop = storefront(&base);
    shop.login("alice@example.com", "pw").await.unwrap();
    let orders = shop.orders().await.unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].status, "completed");
}

// =============================================================================
// admin
// =============================================================================

#[tokio::test]
async fn admin_orders_forbidden_for_users() {
    let (base, _) = spawn_backend().await;
    let shop = storefront(&base);
    shop.login("alice@example.com", "pw").await.unwrap();
    assert_eq!(shop.admin_orders().await.unwrap_err().status(), Some(403));
}

#[tokio::test]
async fn admin_flow() {
    let (base, _) = spawn_backend().await;
    let shop = storefront(&base);
    shop.login("root@example.com", "pw").await.unwrap();
    assert!(shop.session().claims().unwrap().is_admin());

    assert_eq!(shop.admin_orders().await.unwrap().len(), 3);

    let created = shop
        .create_product(&NewProduct {
            title: "Gaming GPU".into(),
            description: "Fast".into(),
            price_cents: 79_999,
            image: None,
            stock: 75,
        })
        .await
        .unwrap();
    assert_eq!(created.id, gpu_id());
    assert_eq!(created.image, None);

    shop.delete_product(gpu_id()).await.unwrap();
}

#[tokio::test]
async fn admin_orders_include_orders_without_user() {
    let (base, _) = spawn_backend().await;
    let shop = storefront(&base);
    shop.login("root@example.com", "pw").await.unwrap();

    let orders = shop.admin_orders().await.unwrap();
    let orphan = orders.iter().find(|o| o.user_id.is_none()).unwrap();
    assert_eq!(orphan.user_email, None);
    assert_eq!(orphan.total_cents, 500);
    assert!(shop.session().is_signed_in());
}

#[tokio::test]
async fn create_product_validation_text() {
    let (base, _) = spawn_backend().await;
    let shop = storefront(&base);
    shop.login("root@example.com", "pw").await.unwrap();
    let err = shop
        .create_product(&NewProduct {
            title: " ".into(),
            description: "d".into(),
            price_cents: 1,
            image: None,
            stock: 1,
        })
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Title is required");
}
