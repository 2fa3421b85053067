//! Session registry mapping session ids to live conversation handles.
//!
//! Backed by `DashMap` so lazy creation is atomic per key: concurrent
//! requests for the same unknown id all receive the same handle. Handles are
//! cloned out of the map before any `.await`; a `DashMap` guard is never held
//! across an await point.
//!
//! Entries live for the lifetime of the registry. There is no eviction.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::chat::conversation::{Conversation, ConversationSettings};
use crate::llm::box_provider::BoxLlmProvider;

/// Shared, lockable conversation handle.
///
/// The async mutex serializes turns within one session so two in-flight
/// requests never interleave their history updates.
pub type SessionHandle = Arc<Mutex<Conversation>>;

/// Registry of active conversations.
///
/// Cloning produces a shared view of the same underlying map.
#[derive(Clone)]
pub struct SessionRegistry {
    sessions: Arc<DashMap<String, SessionHandle>>,
    provider: Arc<BoxLlmProvider>,
    settings: Arc<ConversationSettings>,
}

impl SessionRegistry {
    /// Create an empty registry whose conversations talk to `provider`.
    pub fn new(provider: Arc<BoxLlmProvider>, settings: ConversationSettings) -> Self {
        Self {
            sessions: Arc::new(DashMap::new()),
            provider,
            settings: Arc::new(settings),
        }
    }

    /// Resolve `session_id` to a conversation, creating one if needed.
    ///
    /// An absent or empty id gets a freshly generated UUID v7. An unknown id
    /// is adopted as-is. A known id returns the existing handle; there is no
    /// ownership check.
    pub fn get_or_create(&self, session_id: Option<&str>) -> (String, SessionHandle) {
        let session_id = match session_id.filter(|id| !id.is_empty()) {
            Some(id) => id.to_string(),
            None => Uuid::now_v7().to_string(),
        };

        let handle = self
            .sessions
            .entry(session_id.clone())
            .or_insert_with(|| {
                tracing::info!(session_id = %session_id, "starting new conversation");
                Arc::new(Mutex::new(Conversation::new(
                    session_id.clone(),
                    Arc::clone(&self.provider),
                    Arc::clone(&self.settings),
                )))
            })
            .value()
            .clone();

        (session_id, handle)
    }

    /// Whether a conversation exists for `session_id`.
    pub fn contains(&self, session_id: &str) -> bool {
        self.sessions.contains_key(session_id)
    }

    /// Number of live conversations.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
