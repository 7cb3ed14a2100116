//! 任务进度
//!
//! 进程内唯一的进度记录。写入方只有正在运行的任务，其余读取方拿到的都是克隆出来的快照。

use super::game_task::{GameStatus, GameTask};
use super::split_row::SplitRow;
use crate::error::{ScrapeError, ScrapeResult};
use serde::Serialize;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::info;

/// 进度记录
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressState {
    pub is_active: bool,
    pub step: String,
    pub progress: f64,
    pub games: Vec<GameTask>,
    pub data: Vec<SplitRow>,
}

/// 调试接口返回的概要
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DebugSnapshot {
    pub has_data: bool,
    pub data_length: usize,
    pub sample_data: Vec<SplitRow>,
    pub is_active: bool,
}

/// 共享进度句柄
///
/// 锁只在同步代码里持有，从不跨越 `.await`。
#[derive(Debug, Clone, Default)]
pub struct ProgressHandle {
    inner: Arc<RwLock<ProgressState>>,
}

impl ProgressHandle {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, ProgressState> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, ProgressState> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// 当前状态的完整快照
    pub fn snapshot(&self) -> ProgressState {
        self.read().clone()
    }

    pub fn is_active(&self) -> bool {
        self.read().is_active
    }

    /// 已存储的数据行（只在任务成功结束后才有）
    pub fn rows(&self) -> Vec<SplitRow> {
        self.read().data.clone()
    }

    pub fn debug_snapshot(&self) -> DebugSnapshot {
        let state = self.read();
        DebugSnapshot {
            has_data: !state.data.is_empty(),
            data_length: state.data.len(),
            sample_data: state.data.iter().take(2).cloned().collect(),
            is_active: state.is_active,
        }
    }

    /// 尝试开始新任务
    ///
    /// 已有任务在运行时返回 `Conflict`，且不改动任何状态；否则清空并置为运行中。
    pub fn try_begin(&self, initial_step: &str) -> ScrapeResult<()> {
        let mut state = self.write();
        if state.is_active {
            return Err(ScrapeError::Conflict);
        }
        *state = ProgressState {
            is_active: true,
            step: initial_step.to_string(),
            ..ProgressState::default()
        };
        Ok(())
    }

    /// 更新进度和步骤描述
    pub fn update(&self, progress: f64, step: impl Into<String>) {
        let step = step.into();
        info!("[{:.0}%] {}", progress, step);
        let mut state = self.write();
        state.progress = progress.clamp(0.0, 100.0);
        state.step = step;
    }

    pub fn set_games(&self, games: Vec<GameTask>) {
        self.write().games = games;
    }

    pub fn set_game_status(&self, index: usize, status: GameStatus) {
        if let Some(game) = self.write().games.get_mut(index) {
            game.status = status;
        }
    }

    /// 任务成功结束：保存数据、进度置 100
    pub fn finish(&self, rows: Vec<SplitRow>, step: impl Into<String>) {
        let step = step.into();
        info!("[100%] {}", step);
        let mut state = self.write();
        state.data = rows;
        state.progress = 100.0;
        state.step = step;
        state.is_active = false;
    }

    /// 任务失败结束：进度归零、记录错误信息，之前的数据全部丢弃
    pub fn fail(&self, message: impl Into<String>) {
        let step = message.into();
        info!("[0%] {}", step);
        let mut state = self.write();
        state.data.clear();
        state.progress = 0.0;
        state.step = step;
        state.is_active = false;
    }
}
