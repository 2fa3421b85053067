//! Infrastructure layer for the concierge relay.
//!
//! Contains the concrete [`LlmProvider`](concierge_core::llm::provider::LlmProvider)
//! for Google Gemini and the `concierge.toml` loader.

pub mod config;
pub mod llm;
