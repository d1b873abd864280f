//! 采集流水线状态机
//!
//! 显式的状态枚举 + 转换表。编排层的驱动循环每走一步都经过 `StateMachine::advance`，
//! 转换表之外的转换视为程序错误。

use std::fmt;
use std::path::PathBuf;

use crate::error::{AppError, AppResult};
use crate::models::{ApplicantRecord, Direction, University};

/// 流水线阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineStage {
    Init,
    UniversityResolved,
    DirectionsDiscovered,
    DirectionResolved,
    ListsDownloaded,
    RowsNormalized,
    Published,
    Skipped,
    Failed,
    Done,
}

use PipelineStage::*;

/// 合法转换表
///
/// 每个方向从 `DirectionsDiscovered` 出发，以 `Published`/`Skipped`/`Failed` 结束后回到
/// `DirectionsDiscovered` 处理下一个方向；没有剩余方向时进入 `Done`。
pub const TRANSITIONS: &[(PipelineStage, PipelineStage)] = &[
    (Init, UniversityResolved),
    (UniversityResolved, DirectionsDiscovered),
    (DirectionsDiscovered, DirectionResolved),
    (DirectionsDiscovered, Done),
    (DirectionResolved, ListsDownloaded),
    (ListsDownloaded, RowsNormalized),
    (RowsNormalized, Published),
    // 方向级终止态
    (DirectionsDiscovered, Skipped),
    (DirectionsDiscovered, Failed),
    (DirectionResolved, Skipped),
    (DirectionResolved, Failed),
    (ListsDownloaded, Skipped),
    (ListsDownloaded, Failed),
    (RowsNormalized, Skipped),
    (RowsNormalized, Failed),
    // 下一个方向
    (Published, DirectionsDiscovered),
    (Skipped, DirectionsDiscovered),
    (Failed, DirectionsDiscovered),
];

impl PipelineStage {
    pub fn can_transition_to(self, next: PipelineStage) -> bool {
        TRANSITIONS.contains(&(self, next))
    }

    /// 单个方向的终止态
    pub fn is_direction_terminal(self) -> bool {
        matches!(self, Published | Skipped | Failed)
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Init => "INIT",
            UniversityResolved => "UNIVERSITY_RESOLVED",
            DirectionsDiscovered => "DIRECTIONS_DISCOVERED",
            DirectionResolved => "DIRECTION_RESOLVED",
            ListsDownloaded => "LISTS_DOWNLOADED",
            RowsNormalized => "ROWS_NORMALIZED",
            Published => "PUBLISHED",
            Skipped => "SKIPPED",
            Failed => "FAILED",
            Done => "DONE",
        };
        f.write_str(name)
    }
}

/// 记录当前阶段并校验每一次转换
#[derive(Debug)]
pub struct StateMachine {
    stage: PipelineStage,
    history: Vec<PipelineStage>,
}

impl StateMachine {
    pub fn new() -> Self {
        Self {
            stage: Init,
            history: vec![Init],
        }
    }

    pub fn stage(&self) -> PipelineStage {
        self.stage
    }

    pub fn history(&self) -> &[PipelineStage] {
        &self.history
    }

    pub fn advance(&mut self, next: PipelineStage) -> AppResult<()> {
        if !self.stage.can_transition_to(next) {
            return Err(AppError::IllegalTransition {
                from: self.stage.to_string(),
                to: next.to_string(),
            });
        }
        self.stage = next;
        self.history.push(next);
        Ok(())
    }
}

impl Default for StateMachine {
    fn default() -> Self {
        Self::new()
    }
}

/// 单个大学运行期间的工作状态，仅由编排层持有
#[derive(Debug, Default)]
pub struct PipelineState {
    pub university_url: String,
    pub university: Option<University>,
    pub direction_urls: Vec<String>,
    /// 下一个待处理方向的下标
    pub next_direction: usize,
}

impl PipelineState {
    pub fn new(university_url: impl Into<String>) -> Self {
        Self {
            university_url: university_url.into(),
            ..Default::default()
        }
    }

    /// 取出下一个待处理的方向 URL
    pub fn take_next_direction(&mut self) -> Option<(usize, String)> {
        let index = self.next_direction;
        let url = self.direction_urls.get(index)?.clone();
        self.next_direction += 1;
        Some((index, url))
    }
}

/// 单个方向的工作状态
#[derive(Debug, Default)]
pub struct DirectionState {
    pub direction: Option<Direction>,
    pub files: Vec<PathBuf>,
    pub applicants: Vec<ApplicantRecord>,
    pub rejected_rows: usize,
    pub skip_reason: Option<String>,
}
