//! 分组目录 - 业务能力层
//!
//! 固定的 10 种分组及其双方分类标签

use crate::models::SplitType;

/// 分类标签模板
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryTemplate {
    /// 固定文本
    Literal(&'static str),
    /// "VS <对手代码>"
    VersusOpponent,
    /// "WHEN STARTER STARTS"，拿到双方先发投手后替换为具体名字
    ProjectedStarter,
}

/// 目录中的一项
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitTypeDefinition {
    pub split_type: SplitType,
    pub away: CategoryTemplate,
    pub home: CategoryTemplate,
}

/// 双方的分类标签
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Categories {
    pub away: String,
    pub home: String,
}

const fn literal(split_type: SplitType, away: &'static str, home: &'static str) -> SplitTypeDefinition {
    SplitTypeDefinition {
        split_type,
        away: CategoryTemplate::Literal(away),
        home: CategoryTemplate::Literal(home),
    }
}

/// 分组目录，顺序与页面一致
pub const SPLIT_SCHEMA: [SplitTypeDefinition; 10] = [
    literal(SplitType::All, "ALL GAMES", "ALL GAMES"),
    literal(SplitType::Location, "ON ROAD", "AT HOME"),
    literal(SplitType::Status, "AS FAVORITE", "AS UNDERDOG OR EVEN"),
    literal(
        SplitType::MoneyLine,
        "WHEN LINE WAS -182 TO -152",
        "WHEN LINE WAS +126 TO +156",
    ),
    literal(
        SplitType::LocationAndStatus,
        "AS ROAD FAVORITE",
        "AS HOME UNDERDOG",
    ),
    literal(
        SplitType::OppWinPct,
        "VS TEAMS THAT WIN <46% OF GAMES",
        "VS TEAMS THAT WIN >54% OF GAMES",
    ),
    literal(
        SplitType::OppDefense,
        "VS TEAMS ALLOWING >4.2 RUNS",
        "VS TEAMS ALLOWING 3.0 TO 4.2 RUNS",
    ),
    literal(
        SplitType::Rest,
        "3RD GAME WITHOUT A DAY OFF",
        "3RD GAME WITHOUT A DAY OFF",
    ),
    SplitTypeDefinition {
        split_type: SplitType::HeadToHead,
        away: CategoryTemplate::VersusOpponent,
        home: CategoryTemplate::VersusOpponent,
    },
    SplitTypeDefinition {
        split_type: SplitType::ProjectedStarter,
        away: CategoryTemplate::ProjectedStarter,
        home: CategoryTemplate::ProjectedStarter,
    },
];

/// 查找某个分组的定义
pub fn definition(split_type: SplitType) -> &'static SplitTypeDefinition {
    // SPLIT_SCHEMA 与 SplitType::ALL 一一对应
    let index = SplitType::ALL
        .iter()
        .position(|t| *t == split_type)
        .unwrap_or_default();
    &SPLIT_SCHEMA[index]
}

/// 计算双方的分类标签
///
/// 先发投手只有恰好解析出两个名字时才替换，第一个是客队、第二个是主队。
pub fn resolve_categories(
    split_type: SplitType,
    away_team: &str,
    home_team: &str,
    pitcher_names: &[String],
) -> Categories {
    let def = definition(split_type);
    let starters = match pitcher_names {
        [away, home] => Some((away.as_str(), home.as_str())),
        _ => None,
    };

    Categories {
        away: render(def.away, home_team, starters.map(|(away, _)| away)),
        home: render(def.home, away_team, starters.map(|(_, home)| home)),
    }
}

fn render(template: CategoryTemplate, opponent: &str, starter: Option<&str>) -> String {
    match template {
        CategoryTemplate::Literal(text) => text.to_string(),
        CategoryTemplate::VersusOpponent => format!("VS {}", opponent),
        CategoryTemplate::ProjectedStarter => match starter {
            Some(name) => format!("WHEN {} STARTS", name),
            None => "WHEN STARTER STARTS".to_string(),
        },
    }
}
