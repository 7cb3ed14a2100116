//! CSV 表格生成 - 业务能力层

use crate::models::SplitRow;
use std::borrow::Cow;
use std::mem::take;
use tracing::debug;

/// 可以写成表格一行的记录
pub trait TableRecord {
    /// 本行的列名，按输出顺序
    fn columns(&self) -> Vec<Cow<'_, str>>;

    /// 按列名取值，缺失时返回 None
    fn value(&self, column: &str) -> Option<Cow<'_, str>>;
}

impl TableRecord for SplitRow {
    fn columns(&self) -> Vec<Cow<'_, str>> {
        SplitRow::COLUMNS.iter().map(|c| Cow::Borrowed(*c)).collect()
    }

    fn value(&self, column: &str) -> Option<Cow<'_, str>> {
        SplitRow::value(self, column).map(Cow::Owned)
    }
}

/// 有序的键值对行，列顺序即声明顺序
impl TableRecord for Vec<(String, String)> {
    fn columns(&self) -> Vec<Cow<'_, str>> {
        self.iter().map(|(k, _)| Cow::Borrowed(k.as_str())).collect()
    }

    fn value(&self, column: &str) -> Option<Cow<'_, str>> {
        self.iter()
            .find(|(k, _)| k == column)
            .map(|(_, v)| Cow::Borrowed(v.as_str()))
    }
}

/// 生成 CSV 文本
///
/// 表头取第一行的列名；所有行都按这份表头取值，缺失的列输出为空串。
/// 每个值都加双引号，内部的双引号写成两个。行之间用 `\n` 连接，末尾不加换行。
pub fn to_table<R: TableRecord>(rows: &[R]) -> String {
    let Some(first) = rows.first() else {
        debug!("没有数据，生成空表格");
        return String::new();
    };

    let headers: Vec<String> = first.columns().into_iter().map(Cow::into_owned).collect();
    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(headers.join(","));

    for row in rows {
        let values: Vec<String> = headers
            .iter()
            .map(|header| quote(row.value(header).as_deref().unwrap_or("")))
            .collect();
        lines.push(values.join(","));
    }

    let table = lines.join("\n");
    debug!("表格生成完成: {} 行, {} 字符", rows.len(), table.len());
    table
}

fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

/// 解析 CSV 文本（支持引号和 CRLF）
pub fn parse_table(text: &str) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut row = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    // 当前行是否已有内容（含只有 `""` 的空字段）
    let mut started = false;
    let mut chars = text.chars().peekable();

    if text.is_empty() {
        return rows;
    }

    while let Some(ch) = chars.next() {
        if in_quotes || !matches!(ch, '\r' | '\n') {
            started = true;
        }
        match ch {
            '"' if in_quotes => {
                if matches!(chars.peek(), Some('"')) {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' => in_quotes = true,
            ',' if !in_quotes => row.push(take(&mut field)),
            '\r' | '\n' if !in_quotes => {
                if ch == '\r' && matches!(chars.peek(), Some('\n')) {
                    chars.next();
                }
                row.push(take(&mut field));
                rows.push(take(&mut row));
                started = false;
            }
            _ => field.push(ch),
        }
    }

    // 末行没有换行
    if started {
        row.push(field);
        rows.push(row);
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SideSplit, SplitStat, SplitType};
    use chrono::NaiveDate;

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn split_row(away_category: &str) -> SplitRow {
        let side = |category: &str, team: &str| SideSplit {
            category: category.to_string(),
            team: team.to_string(),
            wins: 12,
            losses: 5,
            win_pct: "71%".to_string(),
            pl: "+340".to_string(),
        };
        SplitRow::new(
            NaiveDate::from_ymd_opt(2025, 7, 4).unwrap(),
            SplitStat {
                split_type: SplitType::OppWinPct,
                away: side(away_category, "BOS"),
                home: side("VS TEAMS THAT WIN >54% OF GAMES", "NYY"),
            },
        )
    }

    #[test]
    fn test_empty_rows() {
        let rows: Vec<SplitRow> = Vec::new();
        assert_eq!(to_table(&rows), "");
    }

    #[test]
    fn test_quotes_are_doubled() {
        let rows = vec![pairs(&[("A", "1"), ("B", "x\"y")])];
        assert_eq!(to_table(&rows), "A,B\n\"1\",\"x\"\"y\"");
    }

    #[test]
    fn test_header_from_first_row_only() {
        let rows = vec![
            pairs(&[("A", "1"), ("B", "2")]),
            pairs(&[("B", "3"), ("C", "4")]),
        ];
        assert_eq!(to_table(&rows), "A,B\n\"1\",\"2\"\n\"\",\"3\"");
    }

    #[test]
    fn test_split_rows_header() {
        let table = to_table(&[split_row("VS TEAMS THAT WIN <46% OF GAMES")]);
        let mut lines = table.lines();
        assert_eq!(lines.next(), Some(SplitRow::COLUMNS.join(",").as_str()));
        assert!(lines.next().unwrap().starts_with("\"2025-07-04\",\"OPP WIN%\","));
        assert!(!table.ends_with('\n'));
    }

    #[test]
    fn test_round_trip_recovers_values() {
        let rows = vec![
            split_row("WHEN \"LEFTY\" O'NEIL STARTS"),
            split_row("ON ROAD, LATE"),
            split_row("multi\nline"),
        ];
        let parsed = parse_table(&to_table(&rows));

        assert_eq!(parsed.len(), rows.len() + 1);
        assert_eq!(parsed[0], SplitRow::COLUMNS.to_vec());
        for (row, fields) in rows.iter().zip(&parsed[1..]) {
            assert_eq!(fields, &row.values().to_vec());
        }
    }

    #[test]
    fn test_parse_table_crlf() {
        let parsed = parse_table("A,B\r\n\"1\",\"\"\r\n");
        assert_eq!(parsed, vec![vec!["A", "B"], vec!["1", ""]]);
    }

    #[test]
    fn test_trailing_empty_field_row_kept() {
        let table = to_table(&[pairs(&[("A", "")])]);
        assert_eq!(table, "A\n\"\"");
        assert_eq!(parse_table(&table), vec![vec!["A"], vec![""]]);
    }
}
