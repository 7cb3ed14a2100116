//! 战绩文本解析 - 业务能力层
//!
//! 纯函数，只把页面上的小段文本转成结构化的值

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

static RECORD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d+)-(\d+),\s*([+-]\d+(?:\.\d+)?)").expect("战绩正则无效")
});

static PITCHER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)when\s+(.+?)\s+starts").expect("投手正则无效"));

/// 胜负场与盈亏
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRecord {
    pub wins: u32,
    pub losses: u32,
    pub pl: String,
}

impl ParsedRecord {
    /// 无法解析时使用的零战绩
    pub fn zero() -> Self {
        Self {
            wins: 0,
            losses: 0,
            pl: "+0".to_string(),
        }
    }
}

impl Default for ParsedRecord {
    fn default() -> Self {
        Self::zero()
    }
}

/// 解析 "12-5, +340" 这样的战绩文本
///
/// 从不失败：格式不对时记一条数据质量警告并返回零战绩。
pub fn parse_record(text: &str) -> ParsedRecord {
    let parsed = RECORD_RE.captures(text).and_then(|caps| {
        Some(ParsedRecord {
            wins: caps[1].parse().ok()?,
            losses: caps[2].parse().ok()?,
            pl: caps[3].to_string(),
        })
    });

    match parsed {
        Some(record) => {
            debug!(
                "战绩解析: \"{}\" -> {}-{}, {}",
                text, record.wins, record.losses, record.pl
            );
            record
        }
        None => {
            warn!("⚠️ 无法解析战绩文本 \"{}\"，按 0-0, +0 处理", text);
            ParsedRecord::zero()
        }
    }
}

/// 从 "Team wins when SMITH starts" 中取出投手名（大写）
pub fn parse_pitcher_name(text: &str) -> Option<String> {
    let name = PITCHER_RE.captures(text)?.get(1)?.as_str().to_uppercase();
    debug!("投手解析: \"{}\" -> {}", text, name);
    Some(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_record_basic() {
        assert_eq!(
            parse_record("12-5, +340"),
            ParsedRecord {
                wins: 12,
                losses: 5,
                pl: "+340".to_string()
            }
        );
    }

    #[test]
    fn test_parse_record_negative_and_embedded() {
        let record = parse_record("Record: 3-9,-415 units");
        assert_eq!(record.wins, 3);
        assert_eq!(record.losses, 9);
        assert_eq!(record.pl, "-415");

        assert_eq!(parse_record("40-38, +2.5").pl, "+2.5");
    }

    #[test]
    fn test_parse_record_garbage_is_zero() {
        assert_eq!(parse_record("garbage"), ParsedRecord::zero());
        assert_eq!(parse_record(""), ParsedRecord::zero());
        // 盈亏缺少符号
        assert_eq!(parse_record("12-5, 340"), ParsedRecord::zero());
    }

    #[test]
    fn test_parse_record_overflow_is_zero() {
        assert_eq!(parse_record("99999999999-1, +5"), ParsedRecord::zero());
    }

    #[test]
    fn test_parse_pitcher_name() {
        assert_eq!(
            parse_pitcher_name("Team wins when SMITH starts").as_deref(),
            Some("SMITH")
        );
        assert_eq!(
            parse_pitcher_name("Yankees are 8-2 WHEN Gerrit Cole STARTS").as_deref(),
            Some("GERRIT COLE")
        );
        assert_eq!(parse_pitcher_name("No probable starter"), None);
        assert_eq!(parse_pitcher_name("when starts"), None);
    }
}
