//! 任务控制 - 编排层
//!
//! 对外暴露启动 / 查询进度 / 下载 / 调试四个操作，HTTP 层只做薄封装。

use super::scrape_job::{ScrapeOrchestrator, INITIAL_STEP};
use crate::error::{ScrapeError, ScrapeResult};
use crate::models::{DebugSnapshot, ProgressHandle, ProgressState};
use crate::services::to_table;
use chrono::Utc;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{error, info};

pub const CSV_CONTENT_TYPE: &str = "text/csv";

/// 后台任务句柄
///
/// 丢弃句柄不会取消任务。
#[derive(Debug)]
pub struct JobHandle {
    handle: JoinHandle<()>,
}

impl JobHandle {
    /// 等待任务结束
    pub async fn join(self) -> ScrapeResult<()> {
        self.handle
            .await
            .map_err(|e| ScrapeError::Unexpected(e.to_string()))
    }
}

/// 可下载的表格文件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDownload {
    pub filename: String,
    pub content_type: &'static str,
    pub content: String,
}

/// 任务控制入口
pub struct JobControl {
    orchestrator: Arc<ScrapeOrchestrator>,
    progress: ProgressHandle,
}

impl JobControl {
    pub fn new(orchestrator: ScrapeOrchestrator) -> Self {
        let progress = orchestrator.progress().clone();
        Self {
            orchestrator: Arc::new(orchestrator),
            progress,
        }
    }

    /// 启动后台任务，立即返回
    ///
    /// 已有任务在运行时返回 `Conflict`，进度记录保持不变。需在 tokio 运行时内调用。
    pub fn start(&self) -> ScrapeResult<JobHandle> {
        self.progress.try_begin(INITIAL_STEP)?;
        info!("📥 收到抓取请求，任务已在后台启动");

        let orchestrator = Arc::clone(&self.orchestrator);
        let handle = tokio::spawn(async move {
            orchestrator.run().await;
        });
        Ok(JobHandle { handle })
    }

    /// 当前进度快照
    pub fn progress(&self) -> ProgressState {
        self.progress.snapshot()
    }

    pub fn debug(&self) -> DebugSnapshot {
        self.progress.debug_snapshot()
    }

    /// 生成最近一次任务的 CSV
    pub fn download(&self) -> ScrapeResult<TableDownload> {
        let rows = self.progress.rows();
        info!("📤 下载请求，可用数据: {} 行", rows.len());
        if rows.is_empty() {
            return Err(ScrapeError::NoData);
        }

        let content = to_table(&rows);
        if content.is_empty() {
            error!("表格生成结果为空");
            return Err(ScrapeError::Serialization("empty table".to_string()));
        }

        let timestamp = Utc::now().format("%Y%m%d_%H%M%S");
        Ok(TableDownload {
            filename: format!("mlb_season_splits_{}.csv", timestamp),
            content_type: CSV_CONTENT_TYPE,
            content,
        })
    }
}
