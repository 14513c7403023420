//! OpenAPI documentation configuration.

use folio_core::ErrorResponse;
use folio_service::AuthorResponse;
use utoipa::OpenApi;

/// OpenAPI documentation for the Folio API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Folio API",
        version = "1.0.0",
        description = "Author lookup demo service",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    paths(
        crate::controllers::author_controller::get_author,
        crate::controllers::author_controller::get_authors,
        crate::controllers::health_controller::health_check,
        crate::controllers::health_controller::readiness_check,
        crate::controllers::health_controller::liveness_check,
    ),
    components(
        schemas(
            AuthorResponse,
            ErrorResponse,
            crate::controllers::health_controller::HealthResponse,
        )
    ),
    tags(
        (name = "authors", description = "Author lookup endpoints"),
        (name = "health", description = "Health check endpoints")
    )
)]
pub struct ApiDoc;
