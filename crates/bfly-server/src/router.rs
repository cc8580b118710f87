use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handler;
use crate::state::AppState;

/// Build the axum router with all butterfly API endpoints.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handler::root_handler))
        .route("/butterflies", post(handler::create_butterfly))
        .route("/butterflies/:id", get(handler::get_butterfly))
        .route("/users", post(handler::create_user))
        .route("/users/:id", get(handler::get_user))
        .route("/ratings", post(handler::create_rating))
        .route("/ratings/users/:user_id", get(handler::get_user_ratings))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
