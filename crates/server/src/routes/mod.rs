use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;

use crate::AppState;

mod status;
mod training;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/train", post(training::train))
        .route("/api/status", get(status::status))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
