pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod state;
pub mod supabase;

use axum::{
    routing::{get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;

use state::AppState;

/// Build the full application router around the given state. Exposed so
/// integration tests can serve the app against a stub store.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(auth_routes())
        .merge(api_routes())
        .with_state(state)
        // Global middleware
        .layer(axum::middleware::from_fn(middleware::cors::cors))
        .layer(TraceLayer::new_for_http())
}

fn auth_routes() -> Router<AppState> {
    use handlers::auth;

    Router::new()
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/verify", get(auth::verify))
}

fn api_routes() -> Router<AppState> {
    use handlers::{config, icons, qr, upload};

    Router::new()
        .route("/api/config", get(config::get))
        // Icon types
        .route("/api/icons", get(icons::list).post(icons::create))
        .route("/api/icons/:code", put(icons::update).delete(icons::delete))
        // QR codes
        .route("/api/qr", get(qr::list))
        .route("/api/qr-create", post(qr::create))
        .route("/api/qr/:id", put(qr::update).delete(qr::delete))
        // Object storage
        .route("/api/upload", post(upload::upload))
}

async fn health() -> Json<Value> {
    Json(json!({
        "success": true,
        "data": { "status": "ok" }
    }))
}
