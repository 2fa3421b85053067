//! Conversation handle for a single chat session.
//!
//! A `Conversation` owns the turn history of one session and a shared
//! reference to the model client. Each call to
//! [`Conversation::send_message`] replays the history to the stateless
//! provider and appends the new exchange only when the call succeeds.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::Instrument;

use concierge_types::llm::{CompletionRequest, LlmError, Message};

use crate::llm::box_provider::BoxLlmProvider;

/// Per-request model parameters shared by every conversation.
#[derive(Debug, Clone)]
pub struct ConversationSettings {
    pub model: String,
    pub system_prompt: String,
    pub temperature: Option<f64>,
    pub max_tokens: Option<u32>,
}

/// Stateful handle for one session's dialogue with the model.
pub struct Conversation {
    session_id: String,
    provider: Arc<BoxLlmProvider>,
    settings: Arc<ConversationSettings>,
    history: Vec<Message>,
    started_at: DateTime<Utc>,
    last_active_at: DateTime<Utc>,
}

impl Conversation {
    pub fn new(
        session_id: String,
        provider: Arc<BoxLlmProvider>,
        settings: Arc<ConversationSettings>,
    ) -> Self {
        let now = Utc::now();
        Self {
            session_id,
            provider,
            settings,
            history: Vec::new(),
            started_at: now,
            last_active_at: now,
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Completed exchanges, oldest first.
    pub fn history(&self) -> &[Message] {
        &self.history
    }

    /// Number of completed user/model exchanges.
    pub fn turn_count(&self) -> usize {
        self.history.len() / 2
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn last_active_at(&self) -> DateTime<Utc> {
        self.last_active_at
    }

    /// Send a user utterance and return the model's raw reply text.
    ///
    /// On error the history is left as it was before the call, so a failed
    /// turn is never replayed to the model.
    pub async fn send_message(&mut self, text: &str) -> Result<String, LlmError> {
        let mut messages = self.history.clone();
        messages.push(Message::user(text));

        let request = CompletionRequest {
            model: self.settings.model.clone(),
            messages,
            system: Some(self.settings.system_prompt.clone()),
            max_tokens: self.settings.max_tokens,
            temperature: self.settings.temperature,
        };

        let span = tracing::info_span!(
            "chat",
            gen_ai.operation.name = "chat",
            gen_ai.provider.name = %self.provider.name(),
            gen_ai.request.model = %request.model,
            session_id = %self.session_id,
            turn = self.turn_count() + 1,
        );
        let response = self.provider.complete(&request).instrument(span).await?;

        tracing::debug!(
            session_id = %self.session_id,
            response_id = %response.id,
            stop_reason = %response.stop_reason,
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            "model replied"
        );

        self.history = request.messages;
        self.history.push(Message::assistant(response.content.clone()));
        self.last_active_at = Utc::now();

        Ok(response.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::test_support::{
        boxed, settings, FailingProvider, FixedReplyProvider, TurnCountingProvider,
    };
    use concierge_types::llm::MessageRole;

    fn conversation<T: crate::llm::provider::LlmProvider + 'static>(provider: T) -> Conversation {
        Conversation::new("s-1".to_string(), boxed(provider), Arc::new(settings()))
    }

    #[tokio::test]
    async fn history_accumulates_across_turns() {
        let mut convo = conversation(TurnCountingProvider);

        assert_eq!(convo.send_message("hello").await.unwrap(), "turn 1");
        assert_eq!(convo.send_message("book a cab").await.unwrap(), "turn 2");

        assert_eq!(convo.turn_count(), 2);
        let history = convo.history();
        assert_eq!(history.len(), 4);
        assert_eq!(history[0], Message::user("hello"));
        assert_eq!(history[1], Message::assistant("turn 1"));
        assert_eq!(history[2].role, MessageRole::User);
        assert_eq!(history[3].content, "turn 2");
    }

    #[tokio::test]
    async fn failed_turn_leaves_history_untouched() {
        let mut convo = conversation(FailingProvider);

        let err = convo.send_message("hello").await.unwrap_err();
        assert!(matches!(err, LlmError::RateLimited(_)));
        assert_eq!(convo.turn_count(), 0);
        assert!(convo.history().is_empty());
    }

    #[tokio::test]
    async fn reply_text_is_returned_raw() {
        let raw = "Done!\n---BOOKING_DATA---\n{}\n---END_BOOKING_DATA---";
        let mut convo = conversation(FixedReplyProvider(raw.to_string()));

        assert_eq!(convo.send_message("confirm").await.unwrap(), raw);
        assert_eq!(convo.session_id(), "s-1");
        assert!(convo.last_active_at() >= convo.started_at());
    }
}
