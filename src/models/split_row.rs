//! Season Splits 数据行

use chrono::NaiveDate;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// 分组类型（固定 10 种，顺序即页面上的展示顺序）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SplitType {
    All,
    Location,
    Status,
    MoneyLine,
    LocationAndStatus,
    OppWinPct,
    OppDefense,
    Rest,
    HeadToHead,
    ProjectedStarter,
}

impl SplitType {
    /// 全部类型，按页面顺序
    pub const ALL: [SplitType; 10] = [
        SplitType::All,
        SplitType::Location,
        SplitType::Status,
        SplitType::MoneyLine,
        SplitType::LocationAndStatus,
        SplitType::OppWinPct,
        SplitType::OppDefense,
        SplitType::Rest,
        SplitType::HeadToHead,
        SplitType::ProjectedStarter,
    ];

    /// 页面和表格中使用的名称
    pub fn label(self) -> &'static str {
        match self {
            SplitType::All => "ALL",
            SplitType::Location => "LOCATION",
            SplitType::Status => "STATUS",
            SplitType::MoneyLine => "MONEY LINE",
            SplitType::LocationAndStatus => "LOCATION & STATUS",
            SplitType::OppWinPct => "OPP WIN%",
            SplitType::OppDefense => "OPP DEFENSE",
            SplitType::Rest => "REST",
            SplitType::HeadToHead => "HEAD TO HEAD",
            SplitType::ProjectedStarter => "PROJECTED STARTER",
        }
    }
}

impl std::fmt::Display for SplitType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// 一方球队在某个分组下的战绩
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SideSplit {
    pub category: String,
    pub team: String,
    pub wins: u32,
    pub losses: u32,
    /// 页面原文，如 "54%"
    pub win_pct: String,
    /// 带符号的盈亏，如 "+340"
    pub pl: String,
}

/// 单个分组的双方数据（不含日期）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitStat {
    pub split_type: SplitType,
    pub away: SideSplit,
    pub home: SideSplit,
}

/// 一场比赛的一行 Season Splits 数据
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitRow {
    pub game_date: NaiveDate,
    pub stat: SplitStat,
}

impl SplitRow {
    /// 表头，顺序固定
    pub const COLUMNS: [&'static str; 14] = [
        "Game Date",
        "Split Type",
        "Away Category",
        "Away Team",
        "Away Wins",
        "Away Losses",
        "Away Win %",
        "Away P/L",
        "Home Category",
        "Home Team",
        "Home Wins",
        "Home Losses",
        "Home Win %",
        "Home P/L",
    ];

    pub fn new(game_date: NaiveDate, stat: SplitStat) -> Self {
        Self { game_date, stat }
    }

    /// 按 `COLUMNS` 顺序输出各列的文本值
    pub fn values(&self) -> [String; 14] {
        let SplitStat {
            split_type,
            away,
            home,
        } = &self.stat;
        [
            self.game_date.format("%Y-%m-%d").to_string(),
            split_type.label().to_string(),
            away.category.clone(),
            away.team.clone(),
            away.wins.to_string(),
            away.losses.to_string(),
            away.win_pct.clone(),
            away.pl.clone(),
            home.category.clone(),
            home.team.clone(),
            home.wins.to_string(),
            home.losses.to_string(),
            home.win_pct.clone(),
            home.pl.clone(),
        ]
    }

    /// 按列名取值
    pub fn value(&self, column: &str) -> Option<String> {
        let index = Self::COLUMNS.iter().position(|c| *c == column)?;
        let values = self.values();
        values.into_iter().nth(index)
    }
}

// 以列名为 key 输出，与下载的表格保持一致
impl Serialize for SplitRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Self::COLUMNS.len()))?;
        for (column, value) in Self::COLUMNS.iter().zip(self.values()) {
            map.serialize_entry(column, &value)?;
        }
        map.end()
    }
}
