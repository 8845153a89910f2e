use std::sync::Arc;

use axum::{middleware, routing::{get, post}, Extension, Json, Router};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::{
    handler::{auth::auth_handler, leaderboard::leaderboard_handler, waitlist},
    middleware::auth,
    AppState,
};

// Health check handler
async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "message": "Server is running"
    }))
}

pub fn create_router(app_state: Arc<AppState>) -> Router {
    // Joining and anything keyed to the caller's own identity require a
    // session token
    let protected_waitlist_routes = Router::new()
        .route("/", post(waitlist::join_waitlist))
        .route("/referral-count", get(waitlist::get_referral_count))
        .route("/referral-link", get(waitlist::get_referral_link))
        .layer(middleware::from_fn(auth));

    let public_waitlist_routes = Router::new()
        .route("/count", get(waitlist::get_waitlist_count));

    let waitlist_routes = Router::new()
        .merge(protected_waitlist_routes)
        .merge(public_waitlist_routes);

    let api_route = Router::new()
        .nest("/auth", auth_handler())
        .nest("/waitlist", waitlist_routes)
        .nest("/leaderboard", leaderboard_handler())
        .route("/healthchecker", get(health_check))
        .layer(TraceLayer::new_for_http())
        .layer(Extension(app_state));

    Router::new().nest("/api", api_route)
}
