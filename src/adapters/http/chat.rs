//! Assistant chat endpoints.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::application::ChatExchange;
use crate::domain::assistant::{ChatMessage, Conversation};
use crate::domain::foundation::ChatSessionId;

use super::error::{parse_id, ApiError};
use super::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct ConversationView {
    pub id: ChatSessionId,
    pub messages: Vec<ChatMessage>,
    pub awaiting_reply: bool,
    pub quick_replies: Vec<&'static str>,
}

impl From<&Conversation> for ConversationView {
    fn from(conversation: &Conversation) -> Self {
        Self {
            id: conversation.id(),
            messages: conversation.messages().to_vec(),
            awaiting_reply: conversation.is_awaiting_reply(),
            quick_replies: conversation.quick_replies().to_vec(),
        }
    }
}

pub fn chat_routes() -> Router<AppState> {
    Router::new()
        .route("/api/chat/sessions", post(open_session))
        .route("/api/chat/sessions/:id", get(get_session).delete(close_session))
        .route("/api/chat/sessions/:id/messages", post(send_message))
}

/// POST /api/chat/sessions
async fn open_session(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<ConversationView>), ApiError> {
    let conversation = state.chat.open().await?;
    Ok((StatusCode::CREATED, Json(ConversationView::from(&conversation))))
}

/// GET /api/chat/sessions/:id
async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ConversationView>, ApiError> {
    let id = parse_id(&id, "chat_id")?;
    let conversation = state.chat.get(id).await?;
    Ok(Json(ConversationView::from(&conversation)))
}

/// DELETE /api/chat/sessions/:id
async fn close_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id, "chat_id")?;
    state.chat.close(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/chat/sessions/:id/messages
///
/// Responds once the assistant's reply has been recorded.
async fn send_message(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<SendMessageRequest>,
) -> Result<Json<ChatExchange>, ApiError> {
    let id = parse_id(&id, "chat_id")?;
    let exchange = state.chat.send_message(id, &request.content).await?;
    Ok(Json(exchange))
}
