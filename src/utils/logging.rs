/// 日志工具模块
///
/// 提供日志初始化和输出的辅助函数
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::orchestrator::RunSummary;

/// 初始化日志
///
/// `RUST_LOG` 优先；否则 `verbose` 时为 debug，默认 info。重复调用无副作用。
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 竞争名单采集");
    info!(
        "📊 大学 ID 区间: {}..={}",
        config.university_id_start, config.university_id_end
    );
    info!(
        "🎓 学习形式: {:?} | 教育层次: {:?}",
        config.education_forms, config.education_levels
    );
    info!("{}", "=".repeat(60));
}

/// 记录单个大学开始处理
pub fn log_university_start(url: &str) {
    info!("\n{}", "─".repeat(60));
    info!("🏛️ 开始处理: {}", url);
}

/// 记录单个大学处理完成
pub fn log_university_complete(university_id: u32, summary: &RunSummary) {
    info!(
        "[大学 {}] ✅ 完成: 方向 {}, 申请人 {}, 跳过/失败 {}",
        university_id,
        summary.directions,
        summary.applicants,
        summary.failures.len()
    );
    for failure in &summary.failures {
        info!(
            "[大学 {}]   - {} ({:?}): {}",
            university_id, failure.code, failure.outcome, failure.reason
        );
    }
}

/// 打印最终统计信息
pub fn print_final_stats(total: &RunSummary, failed_universities: usize) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 大学: {}", total.universities);
    info!("✅ 方向: {}", total.directions);
    info!("✅ 申请人: {}", total.applicants);
    info!("⚠️ 跳过/失败的方向: {}", total.failures.len());
    info!("❌ 失败的大学: {}", failed_universities);
    info!("{}", "=".repeat(60));
}

/// 截断长文本用于日志显示
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
