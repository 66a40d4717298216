use axum::{http::Method, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod auth;
pub mod bookings;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod error;
pub mod middleware;
pub mod state;

pub use state::AppState;

pub fn app(state: AppState) -> Router {
    // CORS Middleware
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
            axum::http::header::USER_AGENT,
        ]);

    // Checkout and booking history only answer to a verified session
    let guarded = Router::new()
        .merge(checkout::routes())
        .merge(bookings::routes())
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::session_guard,
        ));

    Router::new()
        .merge(catalog::routes())
        .merge(cart::routes())
        .merge(auth::routes())
        .merge(guarded)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
