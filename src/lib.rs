pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod services;
pub mod utils;

use crate::config::AppConfig;
use crate::services::storage::LocalStorage;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware::from_fn_with_state,
    routing::{get, post},
};
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

// Headroom for multipart boundaries and part headers on top of the
// configured file size cap; the exact per-file limit is enforced in the
// upload handler.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::files::upload_file,
        handlers::files::list_files,
        handlers::files::download_file,
        handlers::health::health_check,
    ),
    components(
        schemas(
            handlers::files::UploadResponse,
            handlers::files::FileListResponse,
            handlers::health::HealthResponse,
        )
    ),
    tags(
        (name = "files", description = "Token-gated file storage endpoints"),
        (name = "system", description = "Unauthenticated service endpoints")
    )
)]
pub struct ApiDoc;

#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<LocalStorage>,
    pub config: AppConfig,
}

pub fn create_app(state: AppState) -> Router {
    let protected = Router::new()
        .route("/upload", post(handlers::files::upload_file))
        .route("/files", get(handlers::files::list_files))
        .route("/files/:filename", get(handlers::files::download_file))
        .layer(from_fn_with_state(
            state.clone(),
            middleware::auth::require_bearer,
        ));

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(protected)
        .route("/", get(handlers::index::index))
        .route("/health", get(handlers::health::health_check))
        .layer(DefaultBodyLimit::max(
            state.config.max_upload_bytes + MULTIPART_OVERHEAD,
        ))
        .with_state(state)
}
