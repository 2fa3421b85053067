//! Chat orchestration for the `/chat` endpoint.
//!
//! `ChatService::run_turn` resolves the session, forwards the message to the
//! model and post-processes the reply, producing a tagged [`ChatOutcome`].
//! `ChatService::handle_chat` flattens that outcome into the always-200
//! [`ChatResponse`]: an upstream failure becomes an explanatory reply with no
//! fragments rather than a transport error.

use concierge_types::chat::{ChatRequest, ChatResponse};
use concierge_types::llm::LlmError;

use crate::chat::registry::SessionRegistry;
use crate::chat::reply::{process_reply, ProcessedReply};

/// Result of one chat turn before it is flattened for the wire.
#[derive(Debug)]
pub enum ChatOutcome {
    /// The model answered; fragments have been extracted.
    Replied {
        session_id: String,
        reply: ProcessedReply,
    },
    /// The model call failed.
    UpstreamFailed {
        session_id: String,
        error: LlmError,
    },
}

impl ChatOutcome {
    pub fn session_id(&self) -> &str {
        match self {
            ChatOutcome::Replied { session_id, .. }
            | ChatOutcome::UpstreamFailed { session_id, .. } => session_id,
        }
    }

    /// Flatten into the response body. Never fails.
    pub fn into_response(self) -> ChatResponse {
        match self {
            ChatOutcome::Replied { session_id, reply } => ChatResponse {
                reply: reply.text,
                session_id,
                booking: reply.booking.into_option(),
                map_data: reply.map.into_option(),
                places_data: reply.places.into_option().unwrap_or_default(),
            },
            ChatOutcome::UpstreamFailed { session_id, error } => ChatResponse {
                reply: format!("Error processing request: {error}"),
                session_id,
                booking: None,
                map_data: None,
                places_data: Vec::new(),
            },
        }
    }
}

/// Service behind `POST /chat`.
///
/// Cheap to clone; clones share the same registry.
#[derive(Clone)]
pub struct ChatService {
    registry: SessionRegistry,
}

impl ChatService {
    pub fn new(registry: SessionRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    /// Run one turn and report what happened.
    pub async fn run_turn(&self, message: &str, session_id: Option<&str>) -> ChatOutcome {
        let (session_id, handle) = self.registry.get_or_create(session_id);

        let result = {
            let mut conversation = handle.lock().await;
            conversation.send_message(message).await
        };

        match result {
            Ok(raw) => {
                let reply = process_reply(&raw);
                tracing::info!(
                    session_id = %session_id,
                    booking = reply.booking().is_some(),
                    map = reply.map().is_some(),
                    places = reply.places().len(),
                    "chat turn completed"
                );
                ChatOutcome::Replied { session_id, reply }
            }
            Err(error) => {
                tracing::warn!(session_id = %session_id, error = %error, "model call failed");
                ChatOutcome::UpstreamFailed { session_id, error }
            }
        }
    }

    /// Handle a `/chat` request body.
    pub async fn handle_chat(&self, request: ChatRequest) -> ChatResponse {
        self.run_turn(&request.message, request.session_id.as_deref())
            .await
            .into_response()
    }
}
