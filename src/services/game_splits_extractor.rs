//! Season Splits 提取 - 业务能力层
//!
//! 从比赛页的固定区块中取出三组文本片段，按位置与分组目录对齐后生成数据行。
//! 不关心日期，日期由调用方补上。

use super::record_parser::{parse_pitcher_name, parse_record, ParsedRecord};
use super::split_schema::{resolve_categories, SPLIT_SCHEMA};
use crate::config::SplitsSelectors;
use crate::error::ScrapeError;
use crate::infrastructure::PageDriver;
use crate::models::{SideSplit, SplitStat};
use crate::utils::logging::truncate_text;
use anyhow::Result;
use serde::Deserialize;
use tracing::{debug, info, warn};

const DEFAULT_WIN_PCT: &str = "0%";

/// 区块内采集到的原始片段
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SplitFragments {
    pub percentages: Vec<String>,
    pub records: Vec<String>,
    pub pitchers: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct SectionScan {
    found: bool,
    #[serde(flatten)]
    fragments: SplitFragments,
}

/// Season Splits 提取器
pub struct GameSplitsExtractor {
    selectors: SplitsSelectors,
}

impl GameSplitsExtractor {
    pub fn new(selectors: SplitsSelectors) -> Self {
        Self { selectors }
    }

    /// 提取当前页面的 Season Splits
    ///
    /// 区块不存在时返回空列表（该场比赛没有数据，不算错误）。
    pub async fn extract(
        &self,
        page: &dyn PageDriver,
        away_team: &str,
        home_team: &str,
    ) -> Result<Vec<SplitStat>> {
        match self.collect_fragments(page).await? {
            Some(fragments) => Ok(build_stats(&fragments, away_team, home_team)),
            None => {
                warn!("❌ 未找到 Season Splits 区块 ({} @ {})", away_team, home_team);
                Ok(Vec::new())
            }
        }
    }

    /// 采集三组片段；区块不存在时返回 None
    pub async fn collect_fragments(&self, page: &dyn PageDriver) -> Result<Option<SplitFragments>> {
        let value = page.eval(&self.fragments_script()).await?;
        let scan: SectionScan = serde_json::from_value(value).map_err(ScrapeError::from)?;
        if !scan.found {
            return Ok(None);
        }

        let fragments = scan.fragments;
        info!(
            "找到 Season Splits 区块: 百分比 {} 个, 战绩 {} 个, 投手 {} 个",
            fragments.percentages.len(),
            fragments.records.len(),
            fragments.pitchers.len()
        );
        debug!("百分比: {}", truncate_text(&fragments.percentages.join(" | "), 200));
        debug!("战绩: {}", truncate_text(&fragments.records.join(" | "), 200));
        debug!("投手: {}", truncate_text(&fragments.pitchers.join(" | "), 200));
        Ok(Some(fragments))
    }

    /// 定位区块并收集片段文本的脚本
    pub fn fragments_script(&self) -> String {
        let quote = |s: &str| serde_json::to_string(s).unwrap_or_else(|_| "\"\"".to_string());
        format!(
            r#"
            (() => {{
                const section = document.evaluate(
                    {xpath}, document, null, XPathResult.FIRST_ORDERED_NODE_TYPE, null
                ).singleNodeValue;
                if (!section) {{
                    return {{ found: false }};
                }}
                const texts = (selector) => Array.from(section.querySelectorAll(selector))
                    .map(el => (el.textContent || '').trim());
                return {{
                    found: true,
                    percentages: texts({percentage}),
                    records: texts({record}),
                    pitchers: texts({pitcher})
                }};
            }})()
            "#,
            xpath = quote(&self.selectors.section_xpath),
            percentage = quote(&self.selectors.percentage),
            record = quote(&self.selectors.record),
            pitcher = quote(&self.selectors.pitcher),
        )
    }
}

/// 可生成的行数：不超过目录长度，也不超过两组片段各自能凑成的对数
pub fn row_count(fragments: &SplitFragments) -> usize {
    SPLIT_SCHEMA
        .len()
        .min(fragments.percentages.len() / 2)
        .min(fragments.records.len() / 2)
}

/// 按位置把片段与分组目录对齐
///
/// 第 i 行取第 2i 个片段作客队、第 2i+1 个作主队。片段顺序若与页面布局不符，
/// 数据会错位但不会报错。
pub fn build_stats(fragments: &SplitFragments, away_team: &str, home_team: &str) -> Vec<SplitStat> {
    let pitcher_names: Vec<String> = fragments
        .pitchers
        .iter()
        .filter_map(|text| parse_pitcher_name(text))
        .collect();
    debug!("先发投手: {:?}", pitcher_names);

    let win_pct = |index: usize| {
        fragments
            .percentages
            .get(index)
            .cloned()
            .unwrap_or_else(|| DEFAULT_WIN_PCT.to_string())
    };
    let record = |index: usize| {
        fragments
            .records
            .get(index)
            .map(|text| parse_record(text))
            .unwrap_or_default()
    };

    let count = row_count(fragments);
    let mut stats = Vec::with_capacity(count);
    for (i, def) in SPLIT_SCHEMA.iter().take(count).enumerate() {
        let categories =
            resolve_categories(def.split_type, away_team, home_team, &pitcher_names);
        let away_record = record(2 * i);
        let home_record = record(2 * i + 1);

        stats.push(SplitStat {
            split_type: def.split_type,
            away: side(categories.away, away_team, away_record, win_pct(2 * i)),
            home: side(categories.home, home_team, home_record, win_pct(2 * i + 1)),
        });
        debug!("✅ 生成分组 {}", def.split_type);
    }
    stats
}

fn side(category: String, team: &str, record: ParsedRecord, win_pct: String) -> SideSplit {
    SideSplit {
        category,
        team: team.to_string(),
        wins: record.wins,
        losses: record.losses,
        win_pct,
        pl: record.pl,
    }
}
