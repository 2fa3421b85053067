//! `POST /chat`: one conversational turn.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;

use concierge_types::chat::{ChatRequest, ChatResponse};

use crate::http::error::AppError;
use crate::state::AppState;

/// Relay a message to the session's conversation and return the processed
/// reply. Always 200 once the body decodes, including on model failure.
pub async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, AppError> {
    let Json(request) = payload?;
    let response = state.chat_service.handle_chat(request).await;
    Ok(Json(response))
}
