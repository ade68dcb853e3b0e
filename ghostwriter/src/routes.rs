use std::sync::Arc;

use axum::{Json, extract::State};
use llm::LLMClient;
use serde_json::{Value, json};
use tracing::{error, info, instrument};

use crate::{
    error::{ApiError, AppJson},
    generate::{GenerationError, Generator},
    schema::{
        ChatRequest, ChatResponse, PostRequest, PostResponse, ReplyRequest, ReplyResponse,
    },
};

pub const GREETING: &str = "Hello World";

/// State shared by every handler. Cloned per request, never mutated.
#[derive(Clone)]
pub struct AppState {
    pub generator: Generator,
}

impl AppState {
    pub fn new(client: Arc<dyn LLMClient>) -> Self {
        Self {
            generator: Generator::new(client),
        }
    }
}

pub async fn index() -> Json<Value> {
    Json(json!({ "message": GREETING }))
}

#[instrument(skip_all, fields(variant = "chat"))]
pub async fn chat(
    State(state): State<AppState>,
    AppJson(req): AppJson<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    info!(chars = req.message.chars().count(), "chat requested");
    let res = state.generator.chat(&req).await.map_err(failed)?;
    Ok(Json(res))
}

#[instrument(skip_all, fields(variant = "post"))]
pub async fn create_post(
    State(state): State<AppState>,
    AppJson(req): AppJson<PostRequest>,
) -> Result<Json<PostResponse>, ApiError> {
    info!(
        clone_id = ?req.clone_id,
        board = %req.board_description,
        posts = req.post_history.len(),
        replies = req.reply_history.len(),
        "post generation requested"
    );
    let res = state.generator.post(&req).await.map_err(failed)?;
    info!(title = %res.title, "post generated");
    Ok(Json(res))
}

#[instrument(skip_all, fields(variant = "reply"))]
pub async fn create_reply(
    State(state): State<AppState>,
    AppJson(req): AppJson<ReplyRequest>,
) -> Result<Json<ReplyResponse>, ApiError> {
    info!(
        clone_id = ?req.context.clone_id,
        post_title = %req.post_title,
        "reply generation requested"
    );
    let res = state.generator.reply(&req).await.map_err(failed)?;
    info!(chars = res.content.chars().count(), "reply generated");
    Ok(Json(res))
}

fn failed(err: GenerationError) -> ApiError {
    error!(variant = %err.variant(), error = %err, "generation failed");
    ApiError::Generation(err)
}
