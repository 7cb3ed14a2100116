//! 单场比赛处理流程 - 流程层
//!
//! 流程顺序：
//! 1. 导航到比赛页（带超时）
//! 2. 等待渲染 → 滚动到底部 → 再等待
//! 3. 提取 Season Splits
//! 4. 补上比赛日期

use anyhow::{Context, Result};
use std::time::Duration;
use tokio::time::sleep;
use tracing::info;

use crate::config::Config;
use crate::infrastructure::{PageDriver, WaitUntil};
use crate::models::{GameStatus, SplitRow};
use crate::services::GameSplitsExtractor;
use crate::workflow::game_ctx::GameCtx;

const SCROLL_TO_BOTTOM_JS: &str = "(() => { window.scrollTo(0, document.body.scrollHeight); return true; })()";

/// 单场比赛的处理结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameResult {
    /// 提取到数据
    Completed(Vec<SplitRow>),
    /// 页面正常但没有数据
    NoData,
}

impl GameResult {
    pub fn status(&self) -> GameStatus {
        match self {
            GameResult::Completed(_) => GameStatus::Completed,
            GameResult::NoData => GameStatus::NoData,
        }
    }
}

/// 单场比赛处理流程
///
/// - 不持有任何资源（page 由调用方传入）
/// - 失败直接返回错误，由编排层决定如何记录
pub struct GameFlow {
    extractor: GameSplitsExtractor,
    navigation_timeout: Duration,
    game_settle: Duration,
    scroll_settle: Duration,
}

impl GameFlow {
    pub fn new(config: &Config) -> Self {
        Self {
            extractor: GameSplitsExtractor::new(config.splits.clone()),
            navigation_timeout: config.navigation_timeout(),
            game_settle: config.game_settle(),
            scroll_settle: config.scroll_settle(),
        }
    }

    pub async fn run(&self, page: &dyn PageDriver, ctx: &GameCtx) -> Result<GameResult> {
        info!("{} 🔍 开始抓取: {}", ctx, ctx.url);

        page.goto(&ctx.url, WaitUntil::NetworkIdle, self.navigation_timeout)
            .await
            .with_context(|| format!("{} 页面加载失败", ctx))?;

        info!("{} 页面已加载，等待内容渲染...", ctx);
        sleep(self.game_settle).await;

        // 滚动到底部，触发懒加载的区块
        page.eval(SCROLL_TO_BOTTOM_JS)
            .await
            .with_context(|| format!("{} 滚动页面失败", ctx))?;
        sleep(self.scroll_settle).await;

        let stats = self
            .extractor
            .extract(page, &ctx.teams.away, &ctx.teams.home)
            .await
            .with_context(|| format!("{} 提取数据失败", ctx))?;

        if stats.is_empty() {
            info!("{} ⚠️ 没有提取到数据", ctx);
            return Ok(GameResult::NoData);
        }

        info!("{} ✅ 提取完成: {} 个分组", ctx, stats.len());
        let rows = stats
            .into_iter()
            .map(|stat| SplitRow::new(ctx.teams.date, stat))
            .collect();
        Ok(GameResult::Completed(rows))
    }
}
