//! Web UI route definitions

use super::handlers::{self, UiState};
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

/// Create the UI router
pub fn create_router(state: UiState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/add", post(handlers::add))
        // the list page links to these as plain anchors, so GET works too
        .route(
            "/delete",
            get(handlers::delete_get).post(handlers::delete_post),
        )
        .route("/edit", get(handlers::edit_form).post(handlers::edit_submit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
