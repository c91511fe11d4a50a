use crate::models::{CreateTerm, TaxonomyKind, UpdateTerm};
use crate::services::taxonomy;
use crate::web::error::ApiError;
use crate::web::state::AppState;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;
use std::sync::Arc;

/// GET /{resource}
pub async fn list(state: Arc<AppState>, kind: TaxonomyKind) -> Result<Response, ApiError> {
    let terms = taxonomy::list_terms(&state.db, kind)?;
    Ok(Json(terms).into_response())
}

/// GET /{resource}/:slug
pub async fn get_by_slug(
    state: Arc<AppState>,
    kind: TaxonomyKind,
    slug: String,
) -> Result<Response, ApiError> {
    let term = taxonomy::get_term_by_slug(&state.db, kind, &slug)?;
    Ok(Json(term).into_response())
}

/// POST /{resource}
pub async fn create(
    state: Arc<AppState>,
    kind: TaxonomyKind,
    input: CreateTerm,
) -> Result<Response, ApiError> {
    let term = taxonomy::create_term(&state.db, kind, input)?;
    tracing::info!("created {} '{}'", kind.label(), term.slug);
    Ok((StatusCode::CREATED, Json(term)).into_response())
}

/// PUT /{resource}/:id
pub async fn update(
    state: Arc<AppState>,
    kind: TaxonomyKind,
    id: i64,
    patch: UpdateTerm,
) -> Result<Response, ApiError> {
    let term = taxonomy::update_term(&state.db, kind, id, patch)?;
    Ok(Json(term).into_response())
}

/// DELETE /{resource}/:id
pub async fn delete(
    state: Arc<AppState>,
    kind: TaxonomyKind,
    id: i64,
) -> Result<Response, ApiError> {
    taxonomy::delete_term(&state.db, kind, id)?;
    tracing::info!("deleted {} {}", kind.label(), id);
    let body = json!({ "message": format!("{} deleted", kind.label()) });
    Ok(Json(body).into_response())
}
