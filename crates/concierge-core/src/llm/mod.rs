//! LLM provider abstraction.
//!
//! - [`provider::LlmProvider`]: the trait concrete backends implement.
//! - [`box_provider::BoxLlmProvider`]: type-erased wrapper for runtime selection.

pub mod box_provider;
pub mod provider;
