//! Prompt context route: picks uploaded text or knowledge-base chunks for a
//! message and renders the system prompt the completion model should get.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::debug;

use docsage_knowledge::{create_system_prompt, ContextResult};

use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/context", post(build_context))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextRequest {
    pub message: String,
    /// Text of a PDF the user uploaded in this conversation.
    #[serde(default)]
    pub pdf_context: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextResponse {
    #[serde(flatten)]
    pub result: ContextResult,
    pub system_prompt: String,
}

/// POST /api/context
async fn build_context(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ContextRequest>,
) -> Json<ContextResponse> {
    let result = state
        .knowledge_base
        .build_context(&req.message, req.pdf_context.as_deref())
        .await;
    debug!(
        "Context for {:?}: {} chars from [{}]",
        req.message,
        result.context.len(),
        result.sources.join(", ")
    );

    let system_prompt = create_system_prompt(&result);
    Json(ContextResponse {
        result,
        system_prompt,
    })
}
