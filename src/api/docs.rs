//! OpenAPI document for the REST surface.

use axum::Router;
use utoipa::OpenApi;

use super::handlers::{books, messages, system};
use crate::app_state::AppState;

/// OpenAPI description of every REST endpoint.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "site-manager",
        description = "Live message inbox and book list for a personal website"
    ),
    paths(
        system::health_handler,
        messages::list_messages,
        messages::delete_message,
        books::list_books,
        books::get_book,
        books::create_book,
        books::upload_cover,
    ),
    tags(
        (name = "Messages", description = "Inbound messages from the website"),
        (name = "Books", description = "Book gallery and add-book form"),
        (name = "System", description = "Service health"),
    )
)]
pub struct ApiDoc;

/// Path of the generated OpenAPI JSON document.
pub const OPENAPI_PATH: &str = "/api-docs/openapi.json";

/// Serves the OpenAPI document, plus Swagger UI when the `swagger-ui`
/// feature is enabled.
#[cfg(feature = "swagger-ui")]
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(utoipa_swagger_ui::SwaggerUi::new("/swagger-ui").url(OPENAPI_PATH, ApiDoc::openapi()))
}

/// Serves the OpenAPI document, plus Swagger UI when the `swagger-ui`
/// feature is enabled.
#[cfg(not(feature = "swagger-ui"))]
pub fn routes() -> Router<AppState> {
    use axum::Json;
    use axum::routing::get;

    Router::new().route(OPENAPI_PATH, get(|| async { Json(ApiDoc::openapi()) }))
}
