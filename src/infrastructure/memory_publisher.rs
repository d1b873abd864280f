//! 内存发布端：按 `(通道, 自然键)` upsert，用于试运行和测试

use std::collections::BTreeMap;

use serde_json::Value as JsonValue;
use tokio::sync::Mutex;

use crate::error::AppResult;
use crate::infrastructure::publisher::{Channel, Message, Publisher};

#[derive(Default)]
pub struct MemoryPublisher {
    store: Mutex<BTreeMap<(Channel, String), JsonValue>>,
}

impl MemoryPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    async fn upsert<M: Message>(&self, message: &M) -> AppResult<()> {
        let payload = serde_json::to_value(message)?;
        self.store
            .lock()
            .await
            .insert((M::CHANNEL, message.key()), payload);
        Ok(())
    }

    /// 通道中不同键的数量
    pub async fn count(&self, channel: Channel) -> usize {
        self.store
            .lock()
            .await
            .keys()
            .filter(|(c, _)| *c == channel)
            .count()
    }

    pub async fn get(&self, channel: Channel, key: &str) -> Option<JsonValue> {
        self.store
            .lock()
            .await
            .get(&(channel, key.to_string()))
            .cloned()
    }

    pub async fn keys(&self, channel: Channel) -> Vec<String> {
        self.store
            .lock()
            .await
            .keys()
            .filter(|(c, _)| *c == channel)
            .map(|(_, k)| k.clone())
            .collect()
    }
}

impl Publisher for MemoryPublisher {
    async fn publish<M: Message + Sync>(&self, message: &M) -> AppResult<()> {
        self.upsert(message).await
    }

    async fn publish_batch<M: Message + Sync>(&self, messages: &[M]) -> AppResult<()> {
        for message in messages {
            self.upsert(message).await?;
        }
        Ok(())
    }
}
