use axum::{Router, routing::post};

use super::handlers::{create_category, handle_gateway_event};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/categories", post(create_category))
        .route("/api/events", post(handle_gateway_event))
}
