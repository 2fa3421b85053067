//! LLM provider implementations.
//!
//! Provides a provider factory ([`create_provider`]) that constructs the
//! configured backend, and a connection test ([`test_provider_connection`])
//! used by `concierge check`.

pub mod gemini;

use std::time::Duration;

use secrecy::SecretString;

use concierge_core::llm::box_provider::BoxLlmProvider;
use concierge_types::config::ModelConfig;
use concierge_types::llm::{CompletionRequest, LlmError, Message};

use self::gemini::GeminiProvider;

/// Create a [`BoxLlmProvider`] from a [`ModelConfig`].
///
/// # Errors
///
/// Returns [`LlmError::AuthenticationFailed`] when no API key is available,
/// and [`LlmError::InvalidRequest`] for an unknown provider name.
pub fn create_provider(
    config: &ModelConfig,
    api_key: Option<SecretString>,
) -> Result<BoxLlmProvider, LlmError> {
    match config.provider.to_lowercase().as_str() {
        "gemini" => {
            let key = api_key.ok_or(LlmError::AuthenticationFailed)?;
            let provider = GeminiProvider::new(
                key,
                config.model.clone(),
                Duration::from_secs(config.timeout_secs),
            )?
            .with_base_url(config.base_url.clone());
            tracing::debug!(model = %provider.model(), base_url = %config.base_url, "gemini provider ready");
            Ok(BoxLlmProvider::new(provider))
        }
        other => Err(LlmError::InvalidRequest(format!(
            "unsupported provider '{other}'"
        ))),
    }
}

/// Test provider connectivity by sending a minimal completion request.
///
/// # Errors
///
/// Returns the LLM error if the provider fails to respond.
pub async fn test_provider_connection(provider: &BoxLlmProvider) -> Result<String, LlmError> {
    let request = CompletionRequest {
        model: String::new(), // Provider uses its configured default
        messages: vec![Message::user("Hello")],
        system: None,
        max_tokens: Some(16),
        temperature: Some(0.0),
    };
    let response = provider.complete(&request).await?;
    Ok(response.content)
}
