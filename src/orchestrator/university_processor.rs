//! 单个大学处理器 - 编排层
//!
//! ## 职责
//!
//! 驱动一所大学的状态机：解析大学 → 发现方向 → 逐个方向执行 `DirectionFlow`。
//!
//! ## 失败隔离
//!
//! - 单个方向的数据层错误在方向边界被捕获、记录并标记为 SKIPPED/FAILED，其余方向继续
//! - 发布失败等基础设施错误向上传播
//! - 大学级别的错误（大学页面、筛选）返回给调用方，由批量处理器隔离

use std::path::{Path, PathBuf};

use tracing::{error, info, warn};

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::infrastructure::{Navigator, Publisher};
use crate::models::{EducationForm, EducationLevel};
use crate::services::{urls, DirectionDiscovery, UniversityStage};
use crate::workflow::{
    DirectionCtx, DirectionFlow, DirectionReport, PipelineStage, PipelineState, StateMachine,
};

/// 方向未能发布的原因分类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// 技术错误页
    Skipped,
    /// 其余数据层错误（超时、校验失败）
    Failed,
}

impl FailureKind {
    fn stage(self) -> PipelineStage {
        match self {
            FailureKind::Skipped => PipelineStage::Skipped,
            FailureKind::Failed => PipelineStage::Failed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectionFailure {
    pub code: String,
    pub url: String,
    pub outcome: FailureKind,
    pub reason: String,
}

/// 一次运行的统计
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub universities: usize,
    pub directions: usize,
    pub applicants: usize,
    pub failures: Vec<DirectionFailure>,
}

impl RunSummary {
    pub fn merge(&mut self, other: RunSummary) {
        self.universities += other.universities;
        self.directions += other.directions;
        self.applicants += other.applicants;
        self.failures.extend(other.failures);
    }
}

/// 编排器：持有唯一的导航能力和发布端
pub struct Orchestrator<N, P> {
    navigator: N,
    publisher: P,
    university_stage: UniversityStage,
    discovery: DirectionDiscovery,
    flow: DirectionFlow,
    download_root: PathBuf,
}

impl<N: Navigator, P: Publisher> Orchestrator<N, P> {
    pub fn new(config: &Config, navigator: N, publisher: P) -> Self {
        let timeout = config.selector_timeout();
        Self {
            navigator,
            publisher,
            university_stage: UniversityStage::new(timeout),
            discovery: DirectionDiscovery::new(
                config.site_root.clone(),
                timeout * 2000,
                timeout * 30,
                config.settle_delay(),
            ),
            flow: DirectionFlow::new(config),
            download_root: config.download_dir.clone(),
        }
    }

    pub fn navigator(&self) -> &N {
        &self.navigator
    }

    pub fn publisher(&self) -> &P {
        &self.publisher
    }

    /// 处理一所大学
    ///
    /// 方向级别的数据错误只会出现在 `RunSummary::failures` 中。
    pub async fn run(
        &self,
        university_url: &str,
        forms: &[EducationForm],
        levels: &[EducationLevel],
    ) -> AppResult<RunSummary> {
        let university_id = urls::extract_university_id(university_url)?;
        let run_dir = self.create_run_dir(university_id).await?;

        let mut machine = StateMachine::new();
        let mut state = PipelineState::new(university_url);
        let result = self
            .drive(&mut machine, &mut state, forms, levels, &run_dir)
            .await;

        remove_dir(&run_dir).await;
        result
    }

    async fn drive(
        &self,
        machine: &mut StateMachine,
        state: &mut PipelineState,
        forms: &[EducationForm],
        levels: &[EducationLevel],
        run_dir: &Path,
    ) -> AppResult<RunSummary> {
        let mut summary = RunSummary::default();

        loop {
            let next = match machine.stage() {
                PipelineStage::Init => {
                    let university = self
                        .university_stage
                        .resolve(&self.navigator, &state.university_url)
                        .await?;
                    self.publisher.publish(&university).await?;
                    summary.universities += 1;
                    state.university = Some(university);
                    PipelineStage::UniversityResolved
                }
                PipelineStage::UniversityResolved => {
                    state.direction_urls = self.discovery.discover(&self.navigator, forms, levels).await?;
                    PipelineStage::DirectionsDiscovered
                }
                PipelineStage::DirectionsDiscovered => match state.take_next_direction() {
                    Some((index, url)) => {
                        let university_id = state.university.as_ref().map(|u| u.id).unwrap_or_default();
                        let total = state.direction_urls.len();
                        self.run_direction(machine, &mut summary, university_id, index + 1, total, url, run_dir)
                            .await?;
                        continue;
                    }
                    None => PipelineStage::Done,
                },
                PipelineStage::Done => break,
                other => {
                    return Err(AppError::IllegalTransition {
                        from: other.to_string(),
                        to: "university loop".to_string(),
                    })
                }
            };
            machine.advance(next)?;
        }

        Ok(summary)
    }

    /// 执行单个方向，方向边界上隔离数据层错误
    #[allow(clippy::too_many_arguments)]
    async fn run_direction(
        &self,
        machine: &mut StateMachine,
        summary: &mut RunSummary,
        university_id: u32,
        index: usize,
        total: usize,
        url: String,
        run_dir: &Path,
    ) -> AppResult<()> {
        let code = match urls::extract_direction_code(&url) {
            Ok(code) => code,
            Err(e) => {
                warn!("[大学 {}] ⚠️ 无法解析方向 URL {}: {}", university_id, url, e);
                machine.advance(PipelineStage::Failed)?;
                summary.failures.push(DirectionFailure {
                    code: url.clone(),
                    url,
                    outcome: FailureKind::Failed,
                    reason: e.to_string(),
                });
                return machine.advance(PipelineStage::DirectionsDiscovered);
            }
        };

        let ctx = DirectionCtx::new(university_id, index, total, url, code);
        info!("{} 开始处理: {}", ctx, ctx.url);

        let work_dir = run_dir.join(sanitize(&ctx.code));
        let result = self
            .flow
            .run(&self.navigator, &self.publisher, &ctx, machine, &work_dir)
            .await;
        remove_dir(&work_dir).await;

        match result {
            Ok(DirectionReport::Published {
                applicants,
                rejected_rows,
            }) => {
                summary.directions += 1;
                summary.applicants += applicants;
                if rejected_rows > 0 {
                    warn!("{} ⚠️ 有 {} 行未通过校验", ctx, rejected_rows);
                }
            }
            Ok(DirectionReport::Skipped { reason }) => {
                summary.failures.push(DirectionFailure {
                    code: ctx.code.clone(),
                    url: ctx.url.clone(),
                    outcome: FailureKind::Skipped,
                    reason,
                });
            }
            Err(e) if e.is_infrastructure() => {
                error!("{} ❌ 基础设施错误，终止运行: {}", ctx, e);
                return Err(e);
            }
            Err(e) => {
                let outcome = match e {
                    AppError::TechnicalErrorPage { .. } => FailureKind::Skipped,
                    _ => FailureKind::Failed,
                };
                error!(
                    "{} ❌ 处理失败 (停在 {}): {} | {}",
                    ctx,
                    machine.stage(),
                    e,
                    ctx.url
                );
                machine.advance(outcome.stage())?;
                summary.failures.push(DirectionFailure {
                    code: ctx.code.clone(),
                    url: ctx.url.clone(),
                    outcome,
                    reason: e.to_string(),
                });
            }
        }

        machine.advance(PipelineStage::DirectionsDiscovered)
    }

    async fn create_run_dir(&self, university_id: u32) -> AppResult<PathBuf> {
        let dir = self.download_root.join(format!(
            "run-{}-{}",
            university_id,
            chrono::Local::now().format("%Y%m%d%H%M%S%3f")
        ));
        tokio::fs::create_dir_all(&dir).await?;
        Ok(dir)
    }
}

/// 方向代码用作目录名
fn sanitize(code: &str) -> String {
    code.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '.' || c == '-' { c } else { '_' })
        .collect()
}

/// 删除临时目录，不存在时忽略
async fn remove_dir(dir: &Path) {
    match tokio::fs::remove_dir_all(dir).await {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!("⚠️ 无法删除临时目录 {}: {}", dir.display(), e),
    }
}
