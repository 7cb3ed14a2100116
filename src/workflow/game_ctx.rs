//! 比赛处理上下文
//!
//! 封装"我正在处理第几场比赛"这一信息

use crate::models::GameRef;
use std::fmt::Display;

/// 比赛处理上下文
#[derive(Debug, Clone)]
pub struct GameCtx {
    /// 比赛链接
    pub url: String,

    /// 对阵信息
    pub teams: GameRef,

    /// 比赛序号（从1开始，仅用于日志显示）
    pub game_index: usize,

    /// 本次任务的比赛总数
    pub total: usize,
}

impl GameCtx {
    pub fn new(url: impl Into<String>, teams: GameRef, game_index: usize, total: usize) -> Self {
        Self {
            url: url.into(),
            teams,
            game_index,
            total,
        }
    }
}

impl Display for GameCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[比赛 {}/{} {}]",
            self.game_index, self.total, self.teams
        )
    }
}
