//! 发布端边界
//!
//! 下游按消息的自然键做幂等 upsert，重复发布同一个键不会产生重复记录。

use std::fmt;

use serde::Serialize;

use crate::error::AppResult;

/// 发布通道
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Channel {
    Universities,
    Directions,
    Applicants,
}

impl Channel {
    pub fn name(self) -> &'static str {
        match self {
            Channel::Universities => "universities",
            Channel::Directions => "directions",
            Channel::Applicants => "applicants",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 可发布的实体
pub trait Message: Serialize {
    const CHANNEL: Channel;

    /// 自然键，下游以此 upsert
    fn key(&self) -> String;
}

/// 发布时的信封：自然键 + 实体本身
#[derive(Debug, Serialize)]
pub struct Envelope<'a, M: Message> {
    pub key: String,
    pub payload: &'a M,
}

impl<'a, M: Message> Envelope<'a, M> {
    pub fn wrap(payload: &'a M) -> Self {
        Self {
            key: payload.key(),
            payload,
        }
    }
}

/// 发布能力
#[allow(async_fn_in_trait)]
pub trait Publisher {
    async fn publish<M: Message + Sync>(&self, message: &M) -> AppResult<()>;

    /// 批量发布，空批次不发送任何请求
    async fn publish_batch<M: Message + Sync>(&self, messages: &[M]) -> AppResult<()>;
}
