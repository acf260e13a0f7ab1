//! services/api/src/web/chat.rs
//!
//! The AI support chat endpoint. Once the request is valid and the assistant is
//! configured, the endpoint always answers 200: model failures become fallback text.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use std::sync::Arc;
use tracing::info;

use crate::error::ApiError;
use crate::web::protocol::{ChatRequest, ChatResponse, ErrorResponse};
use crate::web::state::AppState;

/// Ask the AI learning assistant a question.
#[utoipa::path(
    post,
    path = "/api/ai-support/chat",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Answer from the model, or a fallback answer", body = ChatResponse),
        (status = 400, description = "Message is missing", body = ErrorResponse),
        (status = 500, description = "AI service is not configured", body = ErrorResponse)
    )
)]
pub async fn chat_handler(
    State(app_state): State<Arc<AppState>>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
    let Json(request) =
        payload.map_err(|e| ApiError::BadRequest(format!("Invalid request body: {}", e)))?;

    let message = request
        .message
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Message is required".to_string()))?;

    let assistant = app_state.assistant.as_ref().ok_or_else(|| {
        ApiError::NotConfigured(
            "AI service is not configured: GEMINI_API_KEY is missing from the server configuration"
                .to_string(),
        )
    })?;

    let reply = assistant.respond(&message).await;
    info!(
        partial = reply.partial,
        fallback = reply.fallback,
        "Answered chat message"
    );

    Ok(Json(ChatResponse {
        success: true,
        message: reply.text,
        partial: reply.partial.then_some(true),
        fallback: reply.fallback.then_some(true),
    }))
}
