//! LlmProvider trait definition.
//!
//! Uses RPITIT for `complete`; [`super::box_provider::BoxLlmProvider`]
//! restores object safety for runtime selection.

use concierge_types::llm::{CompletionRequest, CompletionResponse, LlmError};

/// Trait for hosted model backends.
///
/// Providers are stateless: every request carries the full turn history.
/// Conversation state lives in [`crate::chat::conversation::Conversation`].
///
/// Implementations live in concierge-infra (e.g., `GeminiProvider`).
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (e.g., "gemini").
    fn name(&self) -> &str;

    /// Send a completion request and receive the full response.
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<CompletionResponse, LlmError>> + Send;
}
