pub mod dto;
pub mod errors;
pub mod handlers;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;

use crate::db::ReadingStore;
use handlers::ApiDoc;

/// Request bodies embed base64 images, so the default 2 MB limit is far too
/// small. 15 MiB covers ~11 MiB of raw image after base64 expansion.
pub const MAX_BODY_BYTES: usize = 15 * 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub store: ReadingStore,
    /// Directory for best-effort image copies.
    pub upload_dir: String,
}

pub fn router(state: AppState) -> Router {
    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .route("/api/store-reading", post(handlers::store_reading))
        .with_state(state)
        .split_for_parts();

    router
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route(
            "/api-docs/openapi.json",
            get(move || async move { axum::Json(api) }),
        )
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
