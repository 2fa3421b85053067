//! Shared domain types for the concierge relay.
//!
//! This crate holds the wire shapes of the `/chat` endpoint, the
//! provider-agnostic LLM request/response types, and the configuration
//! structs loaded from `concierge.toml`.
//!
//! Zero infrastructure dependencies -- only serde, serde_json, thiserror.

pub mod chat;
pub mod config;
pub mod llm;
