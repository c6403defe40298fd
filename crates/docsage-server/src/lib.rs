//! DocSage server: axum HTTP glue around the knowledge base.

pub mod routes;
pub mod state;

pub use routes::build_router;
pub use state::AppState;
