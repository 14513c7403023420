//! Author lookup controller.

use crate::{
    observability::{HandlerMeta, HandlerRegistry},
    responses::{ok, ApiResult, AppError},
    state::AppState,
};
use axum::{
    extract::{Query, State},
    routing::get,
    Router,
};
use folio_core::FolioError;
use folio_service::AuthorResponse;
use serde::Deserialize;
use tracing::debug;
use utoipa::IntoParams;

/// Query parameters for `GET /get/author`.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AuthorQuery {
    /// Author id.
    pub id: i32,
}

/// Query parameters for `GET /get/all_authors`.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AuthorsQuery {
    /// Comma-separated author ids, e.g. `1,2,3`.
    pub ids: String,
}

/// Creates the author router and records handler metadata for the
/// observability layer.
pub fn router(registry: &HandlerRegistry) -> Router<AppState> {
    registry.register(
        "/get/author",
        HandlerMeta::new("author_controller::get_author"),
    );
    registry.register(
        "/get/all_authors",
        HandlerMeta::new("author_controller::get_authors").skip_logging(),
    );

    Router::new()
        .route("/get/author", get(get_author))
        .route("/get/all_authors", get(get_authors))
}

/// Get a single author by id.
#[utoipa::path(
    get,
    path = "/get/author",
    params(AuthorQuery),
    tag = "authors",
    responses(
        (status = 200, description = "The author", body = AuthorResponse),
        (status = 404, description = "Author not found", body = folio_core::ErrorResponse)
    )
)]
pub async fn get_author(
    State(state): State<AppState>,
    Query(query): Query<AuthorQuery>,
) -> ApiResult<AuthorResponse> {
    debug!("Get author request: {}", query.id);

    let response = state.author_service.get_author(query.id).await?;
    ok(response)
}

/// Get several authors by comma-separated ids.
///
/// Registered with the skip marker: the handler-boundary log stays silent
/// for this operation, the transport-level log does not.
#[utoipa::path(
    get,
    path = "/get/all_authors",
    params(AuthorsQuery),
    tag = "authors",
    responses(
        (status = 200, description = "The matching authors", body = [AuthorResponse]),
        (status = 400, description = "Malformed id list", body = folio_core::ErrorResponse)
    )
)]
pub async fn get_authors(
    State(state): State<AppState>,
    Query(query): Query<AuthorsQuery>,
) -> ApiResult<Vec<AuthorResponse>> {
    debug!("Get authors request: {}", query.ids);

    let ids = parse_ids(&query.ids)?;
    let response = state.author_service.get_authors(&ids).await?;
    ok(response)
}

/// Parses a comma-separated id list.
fn parse_ids(raw: &str) -> Result<Vec<i32>, AppError> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<i32>().map_err(|_| {
                AppError(FolioError::validation(format!("Invalid author id: {}", part)))
            })
        })
        .collect()
}
