//! Application state shared by the router and the CLI commands.

use std::sync::Arc;

use anyhow::Context;

use concierge_core::chat::conversation::ConversationSettings;
use concierge_core::chat::registry::SessionRegistry;
use concierge_core::chat::service::ChatService;
use concierge_core::llm::box_provider::BoxLlmProvider;
use concierge_core::prompt::system_prompt;
use concierge_infra::config::resolve_api_key;
use concierge_infra::llm::create_provider;
use concierge_types::config::{ConciergeConfig, ModelConfig};

/// Shared application state. Cheap to clone; the session registry is
/// reference-counted inside [`ChatService`].
#[derive(Clone)]
pub struct AppState {
    pub chat_service: ChatService,
}

impl AppState {
    /// Build the configured provider and an empty session registry.
    ///
    /// # Errors
    ///
    /// Fails when the API key variable is unset or the provider cannot be built.
    pub fn init(config: &ConciergeConfig) -> anyhow::Result<Self> {
        let provider = build_provider(&config.model)?;
        Ok(Self::with_provider(provider, &config.model))
    }

    /// Wire state around an already-constructed provider.
    pub fn with_provider(provider: BoxLlmProvider, model: &ModelConfig) -> Self {
        let settings = ConversationSettings {
            model: model.model.clone(),
            system_prompt: system_prompt(model.system_prompt.as_deref()),
            temperature: model.temperature,
            max_tokens: model.max_output_tokens,
        };
        let registry = SessionRegistry::new(Arc::new(provider), settings);
        Self {
            chat_service: ChatService::new(registry),
        }
    }
}

/// Resolve the API key from the environment and construct the provider.
pub fn build_provider(model: &ModelConfig) -> anyhow::Result<BoxLlmProvider> {
    let api_key = resolve_api_key(model).with_context(|| {
        format!(
            "no API key found: set the {} environment variable",
            model.api_key_env
        )
    })?;
    create_provider(model, Some(api_key))
        .with_context(|| format!("failed to create '{}' provider", model.provider))
}
