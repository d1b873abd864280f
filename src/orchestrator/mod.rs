//! 编排层（Orchestration Layer）
//!
//! ## 模块划分
//!
//! ### `batch_processor` - 批量大学处理器
//! - 管理应用生命周期（浏览器、发布端）
//! - 按 ID 区间遍历大学，隔离单个大学的失败
//! - 输出全局统计信息
//!
//! ### `university_processor` - 单个大学处理器
//! - 驱动状态机：大学 → 方向发现 → 逐个方向
//! - 隔离单个方向的失败
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (处理大学 ID 区间)
//!     ↓
//! university_processor (处理 Vec<方向 URL>)
//!     ↓
//! workflow::DirectionFlow (处理单个方向)
//!     ↓
//! services (能力层：详情 / 下载 / 规范化)
//!     ↓
//! infrastructure (基础设施：Navigator / Publisher)
//! ```

pub mod batch_processor;
pub mod university_processor;

pub use batch_processor::{App, AppPublisher};
pub use university_processor::{DirectionFailure, FailureKind, Orchestrator, RunSummary};
