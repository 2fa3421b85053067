//! HTTP layer: the `/chat` relay endpoint and a health probe.

pub mod error;
pub mod handlers;
pub mod router;
