//! Google Gemini LLM provider implementation.
//!
//! [`GeminiProvider`] implements the
//! [`LlmProvider`](concierge_core::llm::provider::LlmProvider) trait over the
//! Gemini REST `generateContent` endpoint.

pub mod client;
pub mod types;

pub use client::GeminiProvider;
