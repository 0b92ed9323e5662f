use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use category_storage::dto::category::{CreateCategoryRequest, MessageResponse};

use crate::error::CategoryError;
use crate::gateway::GatewayEvent;
use crate::state::AppState;

use super::services;

#[utoipa::path(
    post,
    path = "/api/categories",
    request_body = CreateCategoryRequest,
    params(
        ("x-authorizer-claims" = String, Header, description = "Verified token claims as a JSON object, set by the gateway")
    ),
    responses(
        (status = 200, description = "Category saved (CATEGORY_SAVED)", body = MessageResponse),
        (status = 400, description = "INVALID_JSON_FORMAT, MISSING_FIELDS, INVALID_CHARACTERS, DUPLICATE_NAME or MISSING_KEY", body = MessageResponse),
        (status = 403, description = "Caller lacks the required role (FORBIDDEN)", body = MessageResponse),
        (status = 500, description = "INTERNAL_SERVER_ERROR", body = MessageResponse)
    ),
    tag = "categories"
)]
pub async fn create_category(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let event = GatewayEvent::from_forwarded(&headers, body);
    respond(&state, &event).await
}

#[utoipa::path(
    post,
    path = "/api/events",
    request_body = GatewayEvent,
    responses(
        (status = 200, description = "Category saved (CATEGORY_SAVED)", body = MessageResponse),
        (status = 400, description = "Client error, see message code", body = MessageResponse),
        (status = 403, description = "Caller lacks the required role (FORBIDDEN)", body = MessageResponse),
        (status = 500, description = "INTERNAL_SERVER_ERROR", body = MessageResponse)
    ),
    tag = "categories"
)]
pub async fn handle_gateway_event(State(state): State<AppState>, body: Bytes) -> Response {
    match serde_json::from_slice::<GatewayEvent>(&body) {
        Ok(event) => respond(&state, &event).await,
        Err(e) => CategoryError::InvalidJson(e.to_string())
            .into_response_with_detail(state.settings.expose_error_detail),
    }
}

async fn respond(state: &AppState, event: &GatewayEvent) -> Response {
    match services::create_category(state.store.as_ref(), &state.settings, event).await {
        Ok(category) => (
            StatusCode::OK,
            Json(MessageResponse::new("CATEGORY_SAVED").with_category(category)),
        )
            .into_response(),
        Err(err) => err.into_response_with_detail(state.settings.expose_error_detail),
    }
}
