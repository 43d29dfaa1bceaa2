//! HTML web UI for notes

pub mod handlers;
pub mod pages;
pub mod routes;

pub use handlers::{ServerState, UiState};
pub use routes::create_router;
