//! 比赛链接发现 - 业务能力层
//!
//! 在列表页上按顺序尝试多种选择器，第一种能找到比赛链接的策略胜出

use crate::infrastructure::PageDriver;
use crate::models::GameRef;
use anyhow::Result;
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info, warn};

static GAME_ID_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"MLB_(\d{8})_([A-Z]+)@([A-Z]+)").expect("比赛标识正则无效")
});

/// 链接必须包含的片段
const FORECAST_MARKER: &str = "game-forecast";
const GAME_ID_MARKER: &str = "MLB_";
/// 需要排除的专家推荐页
const EXPERT_PICKS_MARKER: &str = "/expert-picks/";

/// 链接解析失败时使用的占位信息
pub const FALLBACK_DATE: (i32, u32, u32) = (2025, 1, 1);
pub const FALLBACK_AWAY: &str = "AWAY";
pub const FALLBACK_HOME: &str = "HOME";

/// 一种选择链接的策略
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorStrategy {
    pub name: &'static str,
    pub selector: &'static str,
}

/// 默认策略，按优先级排列
pub const DEFAULT_STRATEGIES: &[SelectorStrategy] = &[
    SelectorStrategy {
        name: "mlb game-forecast path",
        selector: r#"a[href*="/mlb/game-forecast/"]"#,
    },
    SelectorStrategy {
        name: "any game-forecast link",
        selector: r#"a[href*="game-forecast"]"#,
    },
    SelectorStrategy {
        name: "game-card test id",
        selector: r#"[data-testid="game-card"] a"#,
    },
    SelectorStrategy {
        name: "game-card class",
        selector: ".game-card a",
    },
    SelectorStrategy {
        name: "game id in href",
        selector: r#"a[href*="MLB_"]"#,
    },
];

/// 比赛链接提取器
pub struct GameUrlExtractor {
    base_url: String,
    strategies: Vec<SelectorStrategy>,
}

impl GameUrlExtractor {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_strategies(base_url, DEFAULT_STRATEGIES.to_vec())
    }

    pub fn with_strategies(base_url: impl Into<String>, strategies: Vec<SelectorStrategy>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            strategies,
        }
    }

    /// 在当前页面上发现比赛链接
    ///
    /// 单个策略的查询失败只跳过该策略；全部落空时返回空列表，由调用方决定如何处理。
    pub async fn discover(&self, page: &dyn PageDriver) -> Vec<String> {
        for strategy in &self.strategies {
            let hrefs = match self.query_hrefs(page, strategy).await {
                Ok(hrefs) => hrefs,
                Err(e) => {
                    warn!("选择器策略 '{}' 执行失败: {:#}", strategy.name, e);
                    continue;
                }
            };
            debug!("策略 '{}' 命中 {} 个链接", strategy.name, hrefs.len());

            let urls = self.filter_links(hrefs);
            if !urls.is_empty() {
                info!(
                    "✓ 策略 '{}' 找到 {} 个比赛链接",
                    strategy.name,
                    urls.len()
                );
                for url in &urls {
                    debug!("  {}", url);
                }
                return urls;
            }
        }

        warn!("⚠️ 所有选择器策略都没有找到比赛链接");
        Vec::new()
    }

    async fn query_hrefs(
        &self,
        page: &dyn PageDriver,
        strategy: &SelectorStrategy,
    ) -> Result<Vec<String>> {
        let value = page.eval(&Self::links_script(strategy.selector)).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// 取出选择器命中元素的 href 属性
    pub fn links_script(selector: &str) -> String {
        let selector = serde_json::to_string(selector).unwrap_or_else(|_| "\"\"".to_string());
        format!(
            r#"
            (() => Array.from(document.querySelectorAll({selector}))
                .map(el => el.getAttribute('href'))
                .filter(href => typeof href === 'string' && href.length > 0))()
            "#
        )
    }

    /// 过滤、补全并去重，保留首次出现的顺序
    pub fn filter_links<I>(&self, hrefs: I) -> Vec<String>
    where
        I: IntoIterator<Item = String>,
    {
        let mut urls: Vec<String> = Vec::new();
        for href in hrefs {
            if !is_game_link(&href) {
                continue;
            }
            let full = if href.starts_with('/') {
                format!("{}{}", self.base_url, href)
            } else {
                href
            };
            if !urls.contains(&full) {
                urls.push(full);
            }
        }
        urls
    }
}

fn is_game_link(href: &str) -> bool {
    href.contains(FORECAST_MARKER)
        && href.contains(GAME_ID_MARKER)
        && !href.contains(EXPERT_PICKS_MARKER)
}

/// 从链接中解析日期和双方球队
///
/// 格式 `MLB_<YYYYMMDD>_<AWAY>@<HOME>`，解析不了时返回占位值而不是报错。
pub fn parse_game_url(url: &str) -> GameRef {
    let parsed = GAME_ID_RE.captures(url).and_then(|caps| {
        let date = NaiveDate::parse_from_str(&caps[1], "%Y%m%d").ok()?;
        Some(GameRef {
            date,
            away: caps[2].to_string(),
            home: caps[3].to_string(),
        })
    });

    parsed.unwrap_or_else(|| {
        warn!("⚠️ 无法从链接解析比赛信息: {}", url);
        fallback_game_ref()
    })
}

fn fallback_game_ref() -> GameRef {
    let (y, m, d) = FALLBACK_DATE;
    GameRef {
        date: NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default(),
        away: FALLBACK_AWAY.to_string(),
        home: FALLBACK_HOME.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> GameUrlExtractor {
        GameUrlExtractor::new("https://www.sportsline.com/")
    }

    #[test]
    fn test_filter_links_rules() {
        let hrefs = vec![
            "/mlb/game-forecast/MLB_20250704_BOS@NYY/".to_string(),
            "https://www.sportsline.com/mlb/game-forecast/MLB_20250704_LAD@SF/".to_string(),
            "/mlb/expert-picks/game-forecast/MLB_20250704_BOS@NYY/".to_string(),
            "/mlb/odds/".to_string(),
            "/mlb/game-forecast/preview".to_string(),
            "/mlb/game-forecast/MLB_20250704_BOS@NYY/".to_string(),
        ];

        let urls = extractor().filter_links(hrefs);
        assert_eq!(
            urls,
            vec![
                "https://www.sportsline.com/mlb/game-forecast/MLB_20250704_BOS@NYY/",
                "https://www.sportsline.com/mlb/game-forecast/MLB_20250704_LAD@SF/",
            ]
        );
    }

    #[test]
    fn test_filtered_links_are_valid_and_distinct() {
        let hrefs = (0..20).map(|i| {
            if i % 3 == 0 {
                format!("/mlb/expert-picks/game-forecast/MLB_2025070{}_A@B/", i % 10)
            } else {
                format!("/mlb/game-forecast/MLB_2025070{}_A@B/", i % 4)
            }
        });
        let urls = extractor().filter_links(hrefs);

        for (i, url) in urls.iter().enumerate() {
            assert!(url.contains("MLB_"));
            assert!(!url.contains("/expert-picks/"));
            assert!(!urls[i + 1..].contains(url));
        }
    }

    #[test]
    fn test_links_script_quotes_selector() {
        let script = GameUrlExtractor::links_script(r#"a[href*="MLB_"]"#);
        assert!(script.contains(r#"querySelectorAll("a[href*=\"MLB_\"]")"#));
    }

    #[test]
    fn test_parse_game_url() {
        let game = parse_game_url("https://www.sportsline.com/mlb/game-forecast/MLB_20250704_BOS@NYY/");
        assert_eq!(game.date, NaiveDate::from_ymd_opt(2025, 7, 4).unwrap());
        assert_eq!(game.away, "BOS");
        assert_eq!(game.home, "NYY");
        assert_eq!(game.to_string(), "BOS @ NYY");
    }

    #[test]
    fn test_parse_game_url_fallback() {
        for url in [
            "https://www.sportsline.com/mlb/game-forecast/",
            "https://www.sportsline.com/mlb/game-forecast/MLB_20251345_BOS@NYY/",
        ] {
            let game = parse_game_url(url);
            assert_eq!(game.date, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
            assert_eq!(game.away, "AWAY");
            assert_eq!(game.home, "HOME");
        }
    }
}
