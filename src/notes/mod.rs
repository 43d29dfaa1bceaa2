//! Note models shared by the CLI and the web UI.

pub mod models;

pub use models::*;
