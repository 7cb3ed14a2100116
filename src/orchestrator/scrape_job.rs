//! 抓取任务编排 - 编排层
//!
//! ## 职责
//!
//! 驱动一次完整的抓取任务，是唯一持有浏览器页面的模块。
//!
//! ## 状态流转
//!
//! ```text
//! Idle → Discovering → PerGame(i) → Finalizing → Idle
//!            ↓ 失败
//!          Idle（记录错误信息，进度归零）
//! ```
//!
//! - 单场比赛失败只标记该场为 `error`，继续处理下一场
//! - 只有发现阶段失败或意外错误才会提前结束任务
//! - 数据只在 Finalizing 阶段写入进度记录，失败的任务不保留任何数据

use crate::config::Config;
use crate::error::{ScrapeError, ScrapeResult};
use crate::infrastructure::{BrowserProfile, PageDriver, PageLauncher, WaitUntil};
use crate::models::{GameStatus, GameTask, ProgressHandle, SplitRow};
use crate::services::{parse_game_url, GameUrlExtractor};
use crate::utils::logging::{log_game_start, log_job_complete, log_job_start};
use crate::workflow::{GameCtx, GameFlow, GameResult};
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::time::sleep;
use tracing::{error, warn};

/// 任务开始时的步骤描述
pub const INITIAL_STEP: &str = "Initializing browser...";

/// 逐场处理阶段占用的进度区间
const PER_GAME_START: f64 = 30.0;
const PER_GAME_SPAN: f64 = 65.0;

/// 任务统计
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct JobStats {
    pub total: usize,
    pub completed: usize,
    pub no_data: usize,
    pub failed: usize,
}

/// 抓取任务编排器
pub struct ScrapeOrchestrator {
    config: Config,
    launcher: Arc<dyn PageLauncher>,
    progress: ProgressHandle,
    url_extractor: GameUrlExtractor,
    game_flow: GameFlow,
}

impl ScrapeOrchestrator {
    pub fn new(config: Config, launcher: Arc<dyn PageLauncher>, progress: ProgressHandle) -> Self {
        let url_extractor = GameUrlExtractor::new(config.site_base_url.clone());
        let game_flow = GameFlow::new(&config);
        Self {
            config,
            launcher,
            progress,
            url_extractor,
            game_flow,
        }
    }

    pub fn progress(&self) -> &ProgressHandle {
        &self.progress
    }

    /// 运行一次完整任务
    ///
    /// 调用方需先通过 `ProgressHandle::try_begin` 占位。本方法不会返回错误，
    /// 所有结果都体现在进度记录上。
    pub async fn run(&self) {
        log_job_start(&self.config);

        let outcome = AssertUnwindSafe(self.run_with_browser()).catch_unwind().await;
        let result = outcome.unwrap_or_else(|panic| Err(unexpected(panic)));

        match result {
            Ok(rows) => {
                let step = if rows.is_empty() {
                    "Scraping completed. No season splits data found on available pages."
                        .to_string()
                } else {
                    format!(
                        "Scraping completed successfully! {} data rows extracted.",
                        rows.len()
                    )
                };
                self.progress.finish(rows, step);
            }
            Err(e) => {
                error!("❌ 抓取任务失败: {}", e);
                self.progress.fail(format!("Error: {}", e));
            }
        }
    }

    /// 启动浏览器、执行任务，无论成败都释放浏览器
    async fn run_with_browser(&self) -> ScrapeResult<Vec<SplitRow>> {
        self.progress.update(5.0, "Launching browser...");
        let mut page = self
            .launcher
            .launch()
            .await
            .map_err(|e| ScrapeError::Browser(format!("{:#}", e)))?;

        let result = AssertUnwindSafe(self.run_on_page(page.as_ref()))
            .catch_unwind()
            .await
            .unwrap_or_else(|panic| Err(unexpected(panic)));

        if let Err(e) = page.close().await {
            let err = ScrapeError::ResourceCleanup(format!("{:#}", e));
            warn!("⚠️ {}", err);
        }
        result
    }

    async fn run_on_page(&self, page: &dyn PageDriver) -> ScrapeResult<Vec<SplitRow>> {
        let profile = BrowserProfile::new(
            self.config.user_agent.clone(),
            (self.config.viewport_width, self.config.viewport_height),
        );
        page.configure(&profile).await.map_err(classify)?;

        // ========== Discovering ==========
        self.progress
            .update(10.0, "Finding MLB games on SportsLine.com...");
        page.goto(
            &self.config.listing_url,
            WaitUntil::NetworkAlmostIdle,
            self.config.navigation_timeout(),
        )
        .await
        .map_err(classify)?;
        sleep(self.config.listing_settle()).await;

        self.progress.update(20.0, "Extracting game URLs...");
        sleep(self.config.discovery_settle()).await;
        let urls = self.url_extractor.discover(page).await;
        if urls.is_empty() {
            return Err(ScrapeError::Discovery(
                "No MLB games found for today".to_string(),
            ));
        }

        let games: Vec<GameTask> = urls
            .iter()
            .map(|url| GameTask::new(url.clone(), parse_game_url(url)))
            .collect();
        self.progress.set_games(games.clone());
        self.progress
            .update(25.0, format!("Found {} games for today", games.len()));

        // ========== PerGame ==========
        let (rows, stats) = self.process_games(page, &games).await;
        log_job_complete(&stats, rows.len());
        Ok(rows)
    }

    /// 逐场处理，单场失败不影响其它比赛
    async fn process_games(
        &self,
        page: &dyn PageDriver,
        games: &[GameTask],
    ) -> (Vec<SplitRow>, JobStats) {
        let total = games.len();
        let mut rows = Vec::new();
        let mut stats = JobStats {
            total,
            ..Default::default()
        };

        for (index, game) in games.iter().enumerate() {
            let ctx = GameCtx::new(game.url.clone(), game.teams.clone(), index + 1, total);
            let base = per_game_progress(index, total);
            log_game_start(&ctx);

            if index > 0 {
                self.progress.update(
                    base,
                    format!("Waiting before processing game {}...", index + 1),
                );
                sleep(self.config.inter_game_delay()).await;
            }
            self.progress
                .update(base, format!("Fetching data for {}...", ctx.teams));

            let done = per_game_progress(index + 1, total);
            match self.game_flow.run(page, &ctx).await {
                Ok(result) => {
                    let status = result.status();
                    match result {
                        GameResult::Completed(game_rows) => {
                            stats.completed += 1;
                            self.progress.update(
                                done,
                                format!(
                                    "Completed {} - extracted {} splits",
                                    ctx.teams,
                                    game_rows.len()
                                ),
                            );
                            rows.extend(game_rows);
                        }
                        GameResult::NoData => {
                            stats.no_data += 1;
                            self.progress
                                .update(done, format!("No data found for {}", ctx.teams));
                        }
                    }
                    self.progress.set_game_status(index, status);
                }
                Err(e) => {
                    stats.failed += 1;
                    let err = ScrapeError::per_game(&ctx.url, &e);
                    error!("{} ❌ {}", ctx, err);
                    self.progress
                        .update(done, format!("Error scraping {}", ctx.teams));
                    self.progress.set_game_status(index, GameStatus::Error);
                }
            }
        }

        (rows, stats)
    }
}

/// 第 index 场开始时的进度
pub fn per_game_progress(index: usize, total: usize) -> f64 {
    if total == 0 {
        return PER_GAME_START;
    }
    PER_GAME_START + index as f64 * (PER_GAME_SPAN / total as f64)
}

/// 把基础设施层的错误归类为任务错误
fn classify(err: anyhow::Error) -> ScrapeError {
    match err.downcast::<ScrapeError>() {
        Ok(scrape_err) => scrape_err,
        Err(other) => ScrapeError::Browser(format!("{:#}", other)),
    }
}

fn unexpected(panic: Box<dyn Any + Send>) -> ScrapeError {
    let message = panic
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| panic.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string());
    ScrapeError::Unexpected(message)
}
