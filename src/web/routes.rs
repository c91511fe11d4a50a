use super::handlers;
use super::state::AppState;
use crate::models::{CreateTerm, TaxonomyKind, UpdateTerm};
use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use std::sync::Arc;

pub fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .nest("/categories", taxonomy_routes(TaxonomyKind::Category))
        .nest("/tags", taxonomy_routes(TaxonomyKind::Tag))
        .route("/healthz", get(handlers::healthz))
}

// One route table serves both entity kinds. The `:key` segment is a slug
// for reads and a numeric id for update/delete; they are distinct lookup
// keys for the same row.
fn taxonomy_routes(kind: TaxonomyKind) -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/",
            get(move |State(state): State<Arc<AppState>>| handlers::taxonomy::list(state, kind))
                .post(
                    move |State(state): State<Arc<AppState>>, Json(input): Json<CreateTerm>| {
                        handlers::taxonomy::create(state, kind, input)
                    },
                ),
        )
        .route(
            "/:key",
            get(
                move |State(state): State<Arc<AppState>>, Path(slug): Path<String>| {
                    handlers::taxonomy::get_by_slug(state, kind, slug)
                },
            )
            .put(
                move |State(state): State<Arc<AppState>>,
                      Path(id): Path<i64>,
                      Json(patch): Json<UpdateTerm>| {
                    handlers::taxonomy::update(state, kind, id, patch)
                },
            )
            .delete(
                move |State(state): State<Arc<AppState>>, Path(id): Path<i64>| {
                    handlers::taxonomy::delete(state, kind, id)
                },
            ),
        )
}
