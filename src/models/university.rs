use serde::{Deserialize, Serialize};

use crate::infrastructure::publisher::{Channel, Message};
use crate::models::enums::Source;

/// 大学
///
/// 每次运行由大学阶段创建一次，之后不再修改，只发布一次。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct University {
    /// 站点上的大学 ID
    pub id: u32,
    pub title: String,
    pub source: Source,
    pub url: String,
}

impl Message for University {
    const CHANNEL: Channel = Channel::Universities;

    fn key(&self) -> String {
        self.id.to_string()
    }
}
