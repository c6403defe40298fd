//! Knowledge base status route.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use docsage_knowledge::KnowledgeBaseInfo;

use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/knowledge-base", get(get_info))
}

/// GET /api/knowledge-base: readiness, summary, keywords and stats.
async fn get_info(State(state): State<Arc<AppState>>) -> Json<KnowledgeBaseInfo> {
    Json(state.knowledge_base.info().await)
}
