//! Main application router.

use crate::{
    controllers::{author_controller, health_controller},
    observability::{handler_log_middleware, HandlerRegistry, HttpLogLayer, LogPolicy},
    openapi::ApiDoc,
    state::AppState,
};
use axum::{middleware, routing::get, Router};
use folio_config::{AppConfig, ServerConfig};
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Creates the main application router.
///
/// Middleware ordering matters: the handler log is a `route_layer` of the
/// controller routes (it times the handler alone and can read the response
/// body before compression), while [`HttpLogLayer`] is the outermost layer,
/// wrapping routing itself, so it sees every inbound request and carries the
/// per-request [`LogDecision`](crate::observability::LogDecision) and timing
/// context inward.
pub fn create_router(state: AppState, config: &AppConfig) -> Router {
    let cors = create_cors_layer(&config.server);

    let registry = Arc::new(HandlerRegistry::new());
    let api_router = author_controller::router(&registry);

    let policy = Arc::new(LogPolicy::new(
        &config.log,
        &config.app.environment,
        registry,
    ));

    let api_router = api_router
        .route_layer(middleware::from_fn_with_state(
            Arc::clone(&policy),
            handler_log_middleware,
        ))
        .with_state(state);

    let router = Router::new()
        // Health endpoints
        .merge(health_controller::router())
        // Author endpoints
        .merge(api_router)
        // Swagger UI and OpenAPI spec
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Root endpoint
        .route("/", get(root))
        // Middleware layers, innermost first
        .layer(CompressionLayer::new())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(HttpLogLayer::new(policy, config.server.max_body_size));

    info!("Router created with REST endpoints and Swagger UI at /swagger-ui");
    router
}

/// Creates a CORS layer based on server configuration.
fn create_cors_layer(server_config: &ServerConfig) -> CorsLayer {
    if server_config.cors_enabled {
        if server_config.cors_origins.contains(&"*".to_string()) {
            CorsLayer::permissive()
        } else {
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        }
    } else {
        CorsLayer::new()
    }
}

/// Root endpoint handler.
async fn root() -> &'static str {
    "Folio API v1"
}
