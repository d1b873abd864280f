//! # Applicants Parser
//!
//! 采集 Gosuslugi 大学导航中的大学、招生方向和竞争名单，规范化后发布到下游
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有稀缺资源（Page、HTTP 客户端），只暴露能力
//! - `Navigator` - 页面导航能力，`ChromeNavigator` 基于 chromiumoxide 实现
//! - `Publisher` - 发布能力，`HttpPublisher` / `MemoryPublisher`
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 每个阶段一个服务
//! - `UniversityStage` - 大学页面 → `University`
//! - `DirectionDiscovery` - 筛选 + 分页展开 → 方向 URL 列表
//! - `DirectionDetail` - 方向页面 → `Direction`
//! - `AdmissionDownload` - 各招生批次名单导出
//! - `row_normalizer` - 名单原始行 → `ApplicantRecord`
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 状态机和"一个方向"的完整处理流程
//! - `StateMachine` - 显式阶段 + 转换表
//! - `DirectionFlow` - 详情 → 下载 → 规范化 → 发布
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_processor` - 遍历大学 ID 区间，管理浏览器和发布端
//! - `orchestrator/university_processor` - 单个大学的状态机驱动循环
//!
//! ## 模块结构

pub mod browser;
pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult, ValidationError};
pub use infrastructure::{ChromeNavigator, HttpPublisher, JsExecutor, MemoryPublisher, Navigator, Publisher};
pub use models::{ApplicantRecord, Direction, EducationForm, EducationLevel, University};
pub use orchestrator::{App, Orchestrator, RunSummary};
pub use workflow::{DirectionFlow, PipelineStage, StateMachine};
