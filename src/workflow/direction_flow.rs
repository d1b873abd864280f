//! 方向处理流程 - 流程层
//!
//! 核心职责：定义"一个方向"的完整处理流程
//!
//! 流程顺序（严格串行）：
//! 1. 解析方向详情（技术错误页 → SKIPPED）
//! 2. 下载各招生批次的名单
//! 3. 规范化名单行，删除导出文件
//! 4. 发布方向和申请人

use std::collections::BTreeMap;
use std::path::Path;

use tracing::info;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::infrastructure::{Navigator, Publisher};
use crate::models::ApplicantRecord;
use crate::services::export_reader;
use crate::services::{AdmissionDownload, DirectionDetail, DirectionOutcome, RowContext};
use crate::workflow::direction_ctx::DirectionCtx;
use crate::workflow::pipeline_state::{DirectionState, PipelineStage, StateMachine};

/// 方向处理结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectionReport {
    /// 已发布，附带申请人数量
    Published { applicants: usize, rejected_rows: usize },
    /// 跳过（技术错误页）
    Skipped { reason: String },
}

/// 方向处理流程
///
/// - 只编排阶段顺序
/// - 不持有任何资源（page / publisher），由调用方传入
pub struct DirectionFlow {
    detail: DirectionDetail,
    download: AdmissionDownload,
}

impl DirectionFlow {
    pub fn new(config: &Config) -> Self {
        let timeout = config.selector_timeout();
        Self {
            detail: DirectionDetail::new(timeout, timeout * 5),
            download: AdmissionDownload::new(
                config.site_root.clone(),
                timeout,
                timeout * 10,
                config.download_timeout(),
            ),
        }
    }

    /// 从 `DirectionsDiscovered` 驱动状态机直到方向终止态
    ///
    /// 出错时状态机停留在出错的阶段，由调用方决定转入 `Skipped` 还是 `Failed`。
    pub async fn run<N: Navigator, P: Publisher>(
        &self,
        navigator: &N,
        publisher: &P,
        ctx: &DirectionCtx,
        machine: &mut StateMachine,
        work_dir: &Path,
    ) -> AppResult<DirectionReport> {
        let mut state = DirectionState::default();

        while !machine.stage().is_direction_terminal() {
            let next = match machine.stage() {
                PipelineStage::DirectionsDiscovered => {
                    match self.detail.resolve(navigator, ctx.university_id, &ctx.url).await? {
                        DirectionOutcome::Resolved(direction) => {
                            state.direction = Some(direction);
                            PipelineStage::DirectionResolved
                        }
                        DirectionOutcome::Skipped { reason } => {
                            state.skip_reason = Some(reason);
                            PipelineStage::Skipped
                        }
                    }
                }
                PipelineStage::DirectionResolved => {
                    state.files = self.download.download(navigator, work_dir).await?;
                    PipelineStage::ListsDownloaded
                }
                PipelineStage::ListsDownloaded => {
                    self.normalize(ctx, &mut state).await?;
                    PipelineStage::RowsNormalized
                }
                PipelineStage::RowsNormalized => {
                    self.publish(publisher, ctx, &state).await?;
                    PipelineStage::Published
                }
                other => {
                    return Err(AppError::IllegalTransition {
                        from: other.to_string(),
                        to: "direction flow".to_string(),
                    })
                }
            };
            machine.advance(next)?;
        }

        match machine.stage() {
            PipelineStage::Skipped => Ok(DirectionReport::Skipped {
                reason: state.skip_reason.unwrap_or_default(),
            }),
            _ => Ok(DirectionReport::Published {
                applicants: state.applicants.len(),
                rejected_rows: state.rejected_rows,
            }),
        }
    }

    /// 逐个文件规范化；多个招生批次中的同一申请人按自然键合并（后出现的覆盖）
    async fn normalize(&self, ctx: &DirectionCtx, state: &mut DirectionState) -> AppResult<()> {
        let row_ctx = RowContext {
            university_id: ctx.university_id,
            direction_code: ctx.code.clone(),
        };

        let mut merged: BTreeMap<u64, ApplicantRecord> = BTreeMap::new();
        for file in &state.files {
            let batch = export_reader::normalize_export_file(file, &row_ctx).await?;
            state.rejected_rows += batch.rejected;
            for record in batch.records {
                merged.insert(record.applicant_id, record);
            }
        }
        state.applicants = merged.into_values().collect();
        Ok(())
    }

    async fn publish<P: Publisher>(
        &self,
        publisher: &P,
        ctx: &DirectionCtx,
        state: &DirectionState,
    ) -> AppResult<()> {
        let direction = state.direction.as_ref().ok_or_else(|| AppError::IllegalTransition {
            from: PipelineStage::RowsNormalized.to_string(),
            to: PipelineStage::Published.to_string(),
        })?;

        publisher.publish(direction).await?;
        publisher.publish_batch(&state.applicants).await?;

        info!(
            "{} 📤 已发布方向和 {} 名申请人",
            ctx,
            state.applicants.len()
        );
        Ok(())
    }
}
