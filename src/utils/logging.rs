/// 日志工具模块
///
/// 提供日志格式化和输出的辅助函数
use crate::config::Config;
use crate::orchestrator::JobStats;
use crate::workflow::GameCtx;
use tracing::info;

/// 记录任务启动信息
pub fn log_job_start(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 抓取任务启动");
    info!(
        "开始时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("📋 列表页: {}", config.listing_url);
    info!("⏱️ 比赛间隔: {} ms", config.inter_game_delay_ms);
    info!("{}", "=".repeat(60));
}

/// 记录单场比赛开始
pub fn log_game_start(ctx: &GameCtx) {
    info!("\n{}", "─".repeat(60));
    info!("{} 处理第 {}/{} 场比赛", ctx, ctx.game_index, ctx.total);
}

/// 打印最终统计信息
pub fn log_job_complete(stats: &JobStats, rows: usize) {
    info!("\n{}", "=".repeat(60));
    info!("📊 抓取完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 成功: {}/{}", stats.completed, stats.total);
    info!("⚪ 无数据: {}", stats.no_data);
    info!("❌ 失败: {}", stats.failed);
    info!("📄 数据行: {}", rows);
    info!("{}", "=".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
