//! Business logic for the concierge relay.
//!
//! Defines the [`llm::provider::LlmProvider`] port that the infrastructure
//! layer implements, plus everything the relay owns itself: conversation
//! handles, the session registry, and the reply post-processor that recovers
//! structured fragments from model output. Depends only on
//! `concierge-types` -- never on `concierge-infra` or any HTTP crate.

pub mod chat;
pub mod llm;
pub mod prompt;
