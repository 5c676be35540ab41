//! Application router.
//!
//! Everything runs behind a permissive CORS layer so the generated pages
//! can be opened from other local origins.

use std::sync::Arc;

use axum::http::{header, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use crate::api::endpoints;
use crate::api::types::ApiContext;
use crate::core_state::CoreState;

/// Build the application router.
///
/// NOTE: Path params use `:param` syntax (matchit 0.7 / axum 0.7).
pub fn app_router(core: Arc<CoreState>) -> Router {
    let ctx = ApiContext::new(core);

    Router::new()
        .route("/", get(endpoints::forms::index))
        .route("/fillable-form", get(endpoints::forms::fillable_form))
        .route("/submit-report", post(endpoints::reports::submit))
        .route("/view-pdf/:filename", get(endpoints::reports::view_pdf))
        .route("/api/reports", get(endpoints::reports::list))
        .route("/api/reports/:id", get(endpoints::reports::detail))
        .route("/api/health", get(endpoints::health::check))
        .with_state(ctx)
        .layer(cors_layer())
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::PUT,
            Method::POST,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}
