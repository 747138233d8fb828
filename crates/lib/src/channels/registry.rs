//! Channel registry: register and lookup channels by id.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Handle to a running channel (stop, send message).
#[async_trait]
pub trait ChannelHandle: Send + Sync {
    /// Channel id ("telegram").
    fn id(&self) -> &str;
    /// Stop the channel connector.
    fn stop(&self);
    /// Send a text message to a conversation (Telegram chat_id). Default returns error.
    async fn send_message(&self, _conversation_id: &str, _text: &str) -> Result<(), String> {
        Err("send not implemented".to_string())
    }
}

/// Registry of channel ids to handles. Shared across gateway.
#[derive(Clone)]
pub struct ChannelRegistry {
    inner: Arc<RwLock<HashMap<String, Arc<dyn ChannelHandle>>>>,
}

impl Default for ChannelRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ChannelRegistry {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Register a handle; a previous handle under the same id is stopped.
    pub async fn register(&self, id: String, handle: Arc<dyn ChannelHandle>) {
        let mut g = self.inner.write().await;
        if let Some(old) = g.insert(id.clone(), handle) {
            old.stop();
        }
    }

    pub async fn get(&self, id: &str) -> Option<Arc<dyn ChannelHandle>> {
        let g = self.inner.read().await;
        g.get(id).cloned()
    }

    /// Deliver a reply through the named channel.
    pub async fn send(
        &self,
        channel_id: &str,
        conversation_id: &str,
        text: &str,
    ) -> Result<(), String> {
        let handle = self
            .get(channel_id)
            .await
            .ok_or_else(|| format!("channel not found: {}", channel_id))?;
        handle.send_message(conversation_id, text).await
    }

    /// Stop every registered connector (shutdown).
    pub async fn stop_all(&self) {
        for handle in self.inner.read().await.values() {
            handle.stop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    struct Stub {
        stopped: AtomicBool,
    }

    #[async_trait]
    impl ChannelHandle for Stub {
        fn id(&self) -> &str {
            "stub"
        }

        fn stop(&self) {
            self.stopped.store(true, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn replacing_a_channel_stops_the_old_one() {
        let registry = ChannelRegistry::new();
        let first = Arc::new(Stub {
            stopped: AtomicBool::new(false),
        });
        registry.register("stub".to_string(), first.clone()).await;
        assert!(!first.stopped.load(Ordering::SeqCst));

        registry
            .register(
                "stub".to_string(),
                Arc::new(Stub {
                    stopped: AtomicBool::new(false),
                }),
            )
            .await;
        assert!(first.stopped.load(Ordering::SeqCst));
        assert!(registry.get("stub").await.is_some());
        assert!(registry.send("stub", "1", "hi").await.is_err());
        assert_eq!(
            registry.send("missing", "1", "hi").await.unwrap_err(),
            "channel not found: missing"
        );
    }

    #[tokio::test]
    async fn stop_all_reaches_every_channel() {
        let registry = ChannelRegistry::new();
        let stub = Arc::new(Stub {
            stopped: AtomicBool::new(false),
        });
        registry.register("stub".to_string(), stub.clone()).await;
        registry.stop_all().await;
        assert!(stub.stopped.load(Ordering::SeqCst));
    }
}
