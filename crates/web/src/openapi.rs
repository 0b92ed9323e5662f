use utoipa::OpenApi;

use crate::features::categories::handlers;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::create_category,
        handlers::handle_gateway_event,
    ),
    components(
        schemas(
            category_storage::dto::category::CreateCategoryRequest,
            category_storage::dto::category::CategoryResponse,
            category_storage::dto::category::MessageResponse,
            category_storage::models::Category,
            crate::gateway::GatewayEvent,
        )
    ),
    tags(
        (name = "categories", description = "Admin-only category creation"),
    )
)]
pub struct ApiDoc;
