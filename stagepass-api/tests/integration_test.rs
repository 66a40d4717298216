use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use stagepass_api::{app, state::CheckoutConfig, AppState};
use stagepass_booking::recorder::BookingRecorder;
use stagepass_cart::store::CartStore;
use stagepass_catalog::EventCatalog;
use stagepass_core::gateway::IdentityGateway;
use stagepass_store::{EventBus, FileSnapshotStore, InMemoryDocumentStore, LocalIdentityService};

async fn storefront() -> (Router, TempDir) {
    storefront_with(true, 0, true).await
}

async fn storefront_with(date_index: bool, delay_ms: u64, resolved: bool) -> (Router, TempDir) {
    let dir = TempDir::new().unwrap();

    let gateway = Arc::new(IdentityGateway::new(Arc::new(LocalIdentityService::new(
        "test-secret",
        3600,
    ))));
    if resolved {
        gateway.resolve().await;
    }

    let cart = Arc::new(CartStore::new(Arc::new(FileSnapshotStore::new(
        dir.path().join("cart.json"),
    ))));
    cart.restore().await;

    let state = AppState {
        catalog: Arc::new(EventCatalog::seeded()),
        cart,
        gateway,
        recorder: Arc::new(BookingRecorder::new(Arc::new(InMemoryDocumentStore::new(
            date_index,
        )))),
        bus: EventBus::new(16),
        checkout: CheckoutConfig {
            processing_delay_ms: delay_ms,
        },
    };

    (app(state), dir)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn send(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn authed(method: &str, uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

async fn body_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn sign_up(app: &Router, email: &str) -> String {
    let response = app
        .clone()
        .oneshot(send(
            "POST",
            "/v1/auth/signup",
            json!({"email": email, "password": "hunter22", "confirm_password": "hunter22"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    body["token"].as_str().unwrap().to_string()
}

async fn add_to_cart(app: &Router, event_id: u32, quantity: u32) {
    let response = app
        .clone()
        .oneshot(send(
            "POST",
            "/v1/cart/items",
            json!({"event_id": event_id, "quantity": quantity}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
}

fn ids(body: &Value) -> Vec<u64> {
    body.as_array()
        .unwrap()
        .iter()
        .map(|e| e["id"].as_u64().unwrap())
        .collect()
}

#[tokio::test]
async fn test_list_events_returns_the_lineup() {
    let (app, _dir) = storefront().await;

    let response = app.oneshot(get("/v1/events")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body.as_array().unwrap().len(), 8);
    assert_eq!(body[0]["id"], 1);
    assert_eq!(body[0]["title"], "Summer Jazz Festival");
}

#[tokio::test]
async fn test_search_matches_title_and_location() {
    let (app, _dir) = storefront().await;

    let response = app.oneshot(get("/v1/events?search=jazz")).await.unwrap();
    let body = body_json(response).await;

    // Id 1 matches on title, id 6 on location
    assert_eq!(ids(&body), vec![1, 6]);
}

#[tokio::test]
async fn test_sort_orders_by_price() {
    let (app, _dir) = storefront().await;

    let response = app
        .oneshot(get("/v1/events?sort=price-asc"))
        .await
        .unwrap();
    let body = body_json(response).await;

    let prices: Vec<i64> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["price_cents"].as_i64().unwrap())
        .collect();
    assert!(prices.windows(2).all(|pair| pair[0] <= pair[1]));
    assert_eq!(body[0]["id"], 7);
    assert_eq!(body[7]["id"], 3);
}

#[tokio::test]
async fn test_search_and_sort_compose() {
    let (app, _dir) = storefront().await;

    let response = app
        .oneshot(get("/v1/events?search=jazz&sort=price-asc"))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(ids(&body), vec![6, 1]);
}

#[tokio::test]
async fn test_unknown_sort_key_is_a_bad_request() {
    let (app, _dir) = storefront().await;

    let response = app.oneshot(get("/v1/events?sort=soonest")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["error"], "Unknown sort key: soonest");
}

#[tokio::test]
async fn test_get_event_by_id() {
    let (app, _dir) = storefront().await;

    let response = app.clone().oneshot(get("/v1/events/5")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["title"], "Stand-Up Comedy Gala");

    let response = app.oneshot(get("/v1/events/999")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_add_to_cart_merges_repeat_events() {
    let (app, _dir) = storefront().await;

    let response = app
        .clone()
        .oneshot(send("POST", "/v1/cart/items", json!({"event_id": 1})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["items"][0]["quantity"], 1);
    assert_eq!(body["total_cents"], 45_00);

    let response = app
        .clone()
        .oneshot(send(
            "POST",
            "/v1/cart/items",
            json!({"event_id": 1, "quantity": 2}),
        ))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["items"].as_array().unwrap().len(), 1);
    assert_eq!(body["items"][0]["quantity"], 3);
    assert_eq!(body["total_cents"], 135_00);
}

#[tokio::test]
async fn test_add_unknown_event_is_not_found() {
    let (app, _dir) = storefront().await;

    let response = app
        .oneshot(send("POST", "/v1/cart/items", json!({"event_id": 9999})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_add_zero_quantity_is_a_bad_request() {
    let (app, _dir) = storefront().await;

    let response = app
        .oneshot(send(
            "POST",
            "/v1/cart/items",
            json!({"event_id": 1, "quantity": 0}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_and_remove_cart_rows() {
    let (app, _dir) = storefront().await;
    add_to_cart(&app, 1, 2).await;
    add_to_cart(&app, 7, 1).await;

    // Absolute update
    let response = app
        .clone()
        .oneshot(send("PATCH", "/v1/cart/items/1", json!({"quantity": 5})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["total_cents"], 240_00);

    // Zero removes the row
    let response = app
        .clone()
        .oneshot(send("PATCH", "/v1/cart/items/7", json!({"quantity": 0})))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["items"].as_array().unwrap().len(), 1);

    // Plain removal
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/v1/cart/items/1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let body = body_json(response).await;
    assert!(body["items"].as_array().unwrap().is_empty());
    assert_eq!(body["total_cents"], 0);
}

#[tokio::test]
async fn test_clear_cart() {
    let (app, _dir) = storefront().await;
    add_to_cart(&app, 1, 2).await;
    add_to_cart(&app, 2, 1).await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/v1/cart")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_json(response).await["items"]
        .as_array()
        .unwrap()
        .is_empty());

    let response = app.oneshot(get("/v1/cart")).await.unwrap();
    assert_eq!(body_json(response).await["total_cents"], 0);
}

#[tokio::test]
async fn test_cart_snapshot_survives_a_restart() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("cart.json");

    let first = CartStore::new(Arc::new(FileSnapshotStore::new(&path)));
    first
        .add_to_cart(EventCatalog::seeded().get(1).unwrap().clone(), 2)
        .await
        .unwrap();

    // A fresh process over the same snapshot file
    let second = Arc::new(CartStore::new(Arc::new(FileSnapshotStore::new(&path))));
    second.restore().await;

    let gateway = Arc::new(IdentityGateway::new(Arc::new(LocalIdentityService::new(
        "test-secret",
        3600,
    ))));
    gateway.resolve().await;

    let state = AppState {
        catalog: Arc::new(EventCatalog::seeded()),
        cart: second,
        gateway,
        recorder: Arc::new(BookingRecorder::new(Arc::new(InMemoryDocumentStore::new(
            true,
        )))),
        bus: EventBus::new(16),
        checkout: CheckoutConfig {
            processing_delay_ms: 0,
        },
    };

    let response = app(state).oneshot(get("/v1/cart")).await.unwrap();
    let body = body_json(response).await;
    assert_eq!(body["items"][0]["id"], 1);
    assert_eq!(body["items"][0]["quantity"], 2);
    assert_eq!(body["total_cents"], 90_00);
}

#[tokio::test]
async fn test_signup_validation() {
    let (app, _dir) = storefront().await;

    let cases = [
        (
            json!({"email": "", "password": "hunter22", "confirm_password": "hunter22"}),
            "Please fill in all fields",
        ),
        (
            json!({"email": "fan@example.com", "password": "hunter22", "confirm_password": "hunter23"}),
            "Passwords do not match",
        ),
        (
            json!({"email": "fan@example.com", "password": "four", "confirm_password": "four"}),
            "Password must be at least 6 characters",
        ),
        // Three characters even though the UTF-8 encoding spans six bytes
        (
            json!({"email": "fan@example.com", "password": "ñññ", "confirm_password": "ñññ"}),
            "Password must be at least 6 characters",
        ),
    ];

    for (body, message) in cases {
        let response = app
            .clone()
            .oneshot(send("POST", "/v1/auth/signup", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], message);
    }
}

#[tokio::test]
async fn test_signup_duplicate_email_conflicts() {
    let (app, _dir) = storefront().await;
    sign_up(&app, "fan@example.com").await;

    let response = app
        .oneshot(send(
            "POST",
            "/v1/auth/signup",
            json!({"email": "fan@example.com", "password": "hunter22", "confirm_password": "hunter22"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(
        body_json(response).await["error"],
        "This email is already registered"
    );
}

#[tokio::test]
async fn test_login_logout_round_trip() {
    let (app, _dir) = storefront().await;
    sign_up(&app, "fan@example.com").await;

    let response = app
        .clone()
        .oneshot(send("POST", "/v1/auth/logout", json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .clone()
        .oneshot(get("/v1/auth/session"))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["loading"], false);
    assert!(body["user"].is_null());

    let response = app
        .clone()
        .oneshot(send(
            "POST",
            "/v1/auth/login",
            json!({"email": "fan@example.com", "password": "hunter22"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert!(body["token"].as_str().is_some());
    assert_eq!(body["user"]["email"], "fan@example.com");
}

#[tokio::test]
async fn test_login_failures_share_one_message() {
    let (app, _dir) = storefront().await;
    sign_up(&app, "fan@example.com").await;

    let wrong_password = app
        .clone()
        .oneshot(send(
            "POST",
            "/v1/auth/login",
            json!({"email": "fan@example.com", "password": "wrong"}),
        ))
        .await
        .unwrap();
    let unknown_user = app
        .oneshot(send(
            "POST",
            "/v1/auth/login",
            json!({"email": "stranger@example.com", "password": "hunter22"}),
        ))
        .await
        .unwrap();

    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_user.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        body_json(wrong_password).await["error"],
        body_json(unknown_user).await["error"]
    );
}

#[tokio::test]
async fn test_session_reports_loading_until_resolved() {
    let (app, _dir) = storefront_with(true, 0, false).await;

    let response = app.oneshot(get("/v1/auth/session")).await.unwrap();
    let body = body_json(response).await;
    assert_eq!(body["loading"], true);
    assert!(body["user"].is_null());
}

#[tokio::test]
async fn test_guarded_routes_wait_for_resolution() {
    let (app, _dir) = storefront_with(true, 0, false).await;

    let response = app
        .clone()
        .oneshot(authed("POST", "/v1/checkout", "whatever"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response.headers().get(header::RETRY_AFTER).unwrap(), "1");

    let response = app
        .oneshot(authed("GET", "/v1/bookings", "whatever"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_checkout_requires_a_signed_in_session() {
    let (app, _dir) = storefront().await;
    add_to_cart(&app, 1, 1).await;

    // No token at all
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/v1/checkout")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // A token that does not belong to the live session
    sign_up(&app, "fan@example.com").await;
    let response = app
        .oneshot(authed("POST", "/v1/checkout", "forged-token"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_checkout_books_the_cart_and_clears_it() {
    let (app, _dir) = storefront().await;
    add_to_cart(&app, 1, 2).await;
    add_to_cart(&app, 7, 1).await;
    let token = sign_up(&app, "fan@example.com").await;

    let response = app
        .clone()
        .oneshot(authed("POST", "/v1/checkout", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let booking = body_json(response).await;
    assert_eq!(booking["user_email"], "fan@example.com");
    assert_eq!(booking["total_cents"], 105_00);
    assert_eq!(booking["items"].as_array().unwrap().len(), 2);
    assert!(booking["date"].as_str().is_some());

    // The cart starts over
    let response = app.clone().oneshot(get("/v1/cart")).await.unwrap();
    assert!(body_json(response).await["items"]
        .as_array()
        .unwrap()
        .is_empty());

    // And the booking shows up in history
    let response = app
        .oneshot(authed("GET", "/v1/bookings", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let history = body_json(response).await;
    assert_eq!(history.as_array().unwrap().len(), 1);
    assert_eq!(history[0]["id"], booking["id"]);
}

#[tokio::test]
async fn test_checkout_with_an_empty_cart_is_rejected() {
    let (app, _dir) = storefront().await;
    let token = sign_up(&app, "fan@example.com").await;

    let response = app
        .oneshot(authed("POST", "/v1/checkout", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "Your cart is empty");
}

#[tokio::test]
async fn test_concurrent_checkouts_record_one_booking() {
    let (app, _dir) = storefront_with(true, 40, true).await;
    add_to_cart(&app, 1, 1).await;
    let token = sign_up(&app, "fan@example.com").await;

    let (first, second) = tokio::join!(
        app.clone().oneshot(authed("POST", "/v1/checkout", &token)),
        app.clone().oneshot(authed("POST", "/v1/checkout", &token)),
    );
    let statuses = [first.unwrap().status(), second.unwrap().status()];

    // Exactly one of the two racing requests books; the loser is told no
    assert_eq!(
        statuses
            .iter()
            .filter(|s| **s == StatusCode::CREATED)
            .count(),
        1,
        "statuses were {:?}",
        statuses
    );
    assert!(statuses.iter().all(|s| s.is_success() || s.is_client_error()));

    let response = app
        .oneshot(authed("GET", "/v1/bookings", &token))
        .await
        .unwrap();
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_history_without_a_date_index_still_lists_everything() {
    let (app, _dir) = storefront_with(false, 0, true).await;
    let token = sign_up(&app, "fan@example.com").await;

    add_to_cart(&app, 1, 1).await;
    let response = app
        .clone()
        .oneshot(authed("POST", "/v1/checkout", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    add_to_cart(&app, 2, 1).await;
    let response = app
        .clone()
        .oneshot(authed("POST", "/v1/checkout", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    // The ordered query cannot run, the unordered fallback still answers
    let response = app
        .oneshot(authed("GET", "/v1/bookings", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let history = body_json(response).await;
    assert_eq!(history.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_event_stream_answers_with_sse() {
    let (app, _dir) = storefront().await;

    let response = app.oneshot(get("/v1/auth/stream")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "text/event-stream"
    );
}
