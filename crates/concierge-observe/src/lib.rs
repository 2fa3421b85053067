//! Observability setup for the concierge relay.

pub mod tracing_setup;
