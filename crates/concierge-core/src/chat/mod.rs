//! Chat sessions and reply handling.
//!
//! - [`conversation`]: one session's turn history and the model call.
//! - [`registry`]: session id -> conversation handle, created lazily.
//! - [`reply`]: sentinel-block extraction from raw model output.
//! - [`service`]: ties the three together for the `/chat` endpoint.

pub mod conversation;
pub mod registry;
pub mod reply;
pub mod service;
