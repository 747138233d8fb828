//! In-memory dialogue sessions keyed by conversation id.
//!
//! The gateway takes a conversation's session out, runs the engine, and puts the new
//! session back. Nothing is persisted; a restart starts every conversation over.

use crate::dialogue::Session;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Conversation identifier from the transport (e.g. Telegram chat id).
pub type ConversationId = String;

/// In-memory store for sessions (take, put, remove).
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<ConversationId, Session>>>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Remove and return the session for a conversation, if any.
    pub async fn take(&self, id: &str) -> Option<Session> {
        self.inner.write().await.remove(id)
    }

    /// Store the session for a conversation, replacing any previous one.
    pub async fn put(&self, id: impl Into<ConversationId>, session: Session) {
        self.inner.write().await.insert(id.into(), session);
    }

    /// Return a clone of the session if it exists.
    pub async fn get(&self, id: &str) -> Option<Session> {
        self.inner.read().await.get(id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }
}
