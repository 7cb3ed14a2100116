//! 比赛任务

use chrono::NaiveDate;
use serde::Serialize;
use std::fmt::Display;

/// 从比赛链接解析出的对阵信息
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameRef {
    pub date: NaiveDate,
    pub away: String,
    pub home: String,
}

impl Display for GameRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} @ {}", self.away, self.home)
    }
}

/// 比赛处理状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    Pending,
    Completed,
    NoData,
    Error,
}

/// 一场待抓取的比赛
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameTask {
    pub url: String,
    pub teams: GameRef,
    pub status: GameStatus,
}

impl GameTask {
    pub fn new(url: impl Into<String>, teams: GameRef) -> Self {
        Self {
            url: url.into(),
            teams,
            status: GameStatus::Pending,
        }
    }
}
