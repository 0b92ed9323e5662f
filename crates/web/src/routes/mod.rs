use axum::{
    Json, Router,
    http::{HeaderName, Method, header},
    routing::get,
};
use serde_json::{Value, json};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;

use crate::features::categories;
use crate::openapi::ApiDoc;
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(categories::routes::routes())
        .route("/health", get(health))
        .route("/api-docs/openapi.json", get(openapi))
        .layer(cors())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static("x-amz-date"),
            header::AUTHORIZATION,
            HeaderName::from_static("x-api-key"),
            HeaderName::from_static("x-amz-security-token"),
        ])
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode},
        response::Response,
    };
    use tower::ServiceExt;

    use super::*;
    use crate::config::PipelineSettings;
    use crate::gateway::CLAIMS_HEADER;
    use crate::test_utils::InMemoryCategoryStore;

    fn app(store: InMemoryCategoryStore) -> Router {
        router(AppState::new(Arc::new(store), PipelineSettings::default()))
    }

    fn post(uri: &str, claims: Option<&str>, body: &str) -> Request<Body> {
        post_raw(uri, claims, body.as_bytes())
    }

    fn post_raw(uri: &str, claims: Option<&str>, body: &[u8]) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(claims) = claims {
            builder = builder.header(CLAIMS_HEADER, claims);
        }
        builder.body(Body::from(body.to_vec())).unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    const ADMIN: Option<&str> = Some(r#"{"cognito:groups":"admin"}"#);

    #[tokio::test]
    async fn test_scenario_category_saved() {
        let response = app(InMemoryCategoryStore::default())
            .oneshot(post("/api/categories", ADMIN, r#"{"name":"Snacks"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["message"], "CATEGORY_SAVED");
        assert_eq!(body["category"]["name"], "Snacks");
        assert_eq!(body["category"]["status"], true);
    }

    #[tokio::test]
    async fn test_scenario_duplicate_name() {
        let response = app(InMemoryCategoryStore::with_names(&["Snacks"]))
            .oneshot(post("/api/categories", ADMIN, r#"{"name":"Snacks"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["message"], "DUPLICATE_NAME");
    }

    #[tokio::test]
    async fn test_scenario_forbidden() {
        let response = app(InMemoryCategoryStore::default())
            .oneshot(post(
                "/api/categories",
                Some(r#"{"cognito:groups":"viewer"}"#),
                r#"{"name":"Snacks"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(json_body(response).await["message"], "FORBIDDEN");
    }

    #[tokio::test]
    async fn test_scenario_invalid_characters() {
        let response = app(InMemoryCategoryStore::default())
            .oneshot(post("/api/categories", ADMIN, r#"{"name":"<script>"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["message"], "INVALID_CHARACTERS");
    }

    #[tokio::test]
    async fn test_scenario_invalid_json() {
        let response = app(InMemoryCategoryStore::default())
            .oneshot(post("/api/categories", ADMIN, "not json"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["message"], "INVALID_JSON_FORMAT");
        assert!(body.get("error").is_none());
    }

    #[tokio::test]
    async fn test_scenario_missing_fields() {
        let response = app(InMemoryCategoryStore::default())
            .oneshot(post("/api/categories", ADMIN, "{}"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["message"], "MISSING_FIELDS");
    }

    #[tokio::test]
    async fn test_missing_claims_header_is_missing_key() {
        let response = app(InMemoryCategoryStore::default())
            .oneshot(post("/api/categories", None, r#"{"name":"Snacks"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["message"], "MISSING_KEY");
        assert_eq!(body["error"], "requestContext.authorizer.claims");
    }

    const NOT_UTF8: &[u8] = &[0xff, 0xfe, b'{'];

    #[tokio::test]
    async fn test_non_utf8_body_follows_check_order() {
        let cases = [
            (Some(r#"{"cognito:groups":"viewer"}"#), StatusCode::FORBIDDEN, "FORBIDDEN"),
            (ADMIN, StatusCode::BAD_REQUEST, "INVALID_JSON_FORMAT"),
            (None, StatusCode::BAD_REQUEST, "MISSING_KEY"),
        ];

        for (claims, status, code) in cases {
            let response = app(InMemoryCategoryStore::default())
                .oneshot(post_raw("/api/categories", claims, NOT_UTF8))
                .await
                .unwrap();

            assert_eq!(response.status(), status, "{claims:?}");
            assert_eq!(json_body(response).await["message"], code, "{claims:?}");
        }
    }

    #[tokio::test]
    async fn test_non_utf8_gateway_event_is_invalid_json() {
        let response = app(InMemoryCategoryStore::default())
            .oneshot(post_raw("/api/events", None, NOT_UTF8))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["message"], "INVALID_JSON_FORMAT");
    }

    #[tokio::test]
    async fn test_gateway_event_is_handled() {
        let event = json!({
            "body": r#"{"name":"Snacks"}"#,
            "requestContext": { "authorizer": { "claims": { "cognito:groups": ["admin"] } } }
        });

        let response = app(InMemoryCategoryStore::default())
            .oneshot(post("/api/events", None, &event.to_string()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["message"], "CATEGORY_SAVED");
    }

    #[tokio::test]
    async fn test_gateway_event_without_request_context() {
        let event = json!({ "body": r#"{"name":"Snacks"}"#, "requestContext": {} });

        let response = app(InMemoryCategoryStore::default())
            .oneshot(post("/api/events", None, &event.to_string()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["message"], "MISSING_KEY");
        assert!(body.get("error").is_some());
    }

    #[tokio::test]
    async fn test_storage_failure_hides_detail() {
        let response = app(InMemoryCategoryStore::default().failing_insert())
            .oneshot(post("/api/categories", ADMIN, r#"{"name":"Snacks"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = json_body(response).await;
        assert_eq!(body["message"], "INTERNAL_SERVER_ERROR");
        assert!(body.get("error").is_none());
    }

    #[tokio::test]
    async fn test_storage_failure_detail_when_exposed() {
        let settings = PipelineSettings {
            expose_error_detail: true,
            ..PipelineSettings::default()
        };
        let app = router(AppState::new(
            Arc::new(InMemoryCategoryStore::default().failing_insert()),
            settings,
        ));

        let response = app
            .oneshot(post("/api/categories", ADMIN, r#"{"name":"Snacks"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(json_body(response).await["error"].is_string());
    }

    #[tokio::test]
    async fn test_cors_preflight() {
        let request = Request::builder()
            .method("OPTIONS")
            .uri("/api/categories")
            .header(header::ORIGIN, "https://admin.example.com")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .body(Body::empty())
            .unwrap();

        let response = app(InMemoryCategoryStore::default()).oneshot(request).await.unwrap();

        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "*"
        );
    }

    #[tokio::test]
    async fn test_health_and_openapi() {
        let response = app(InMemoryCategoryStore::default())
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app(InMemoryCategoryStore::default())
            .oneshot(Request::get("/api-docs/openapi.json").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let doc = json_body(response).await;
        assert!(doc["paths"].get("/api/categories").is_some());
    }
}
