//! 值班名册读取
//!
//! 名册以 JSON 工作簿形式存放在对象存储中：
//!
//! ```json
//! {"sheets": {"シフト": [["名前", "", "", "日付", "", "", "", "", "電話番号"], ["山田", "", "", "2026-10-18", "", "", "", "", "090-1234-5678"]]}}
//! ```
//!
//! 第一行是表头，其后每行按列位置取姓名、值班日期和电话。

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime};
use escalator_core::{
    config::RosterConfig, Candidate, EscalatorError, EscalatorResult, ObjectStore,
};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};

/// 表格软件序列日期的纪元
const SERIAL_DATE_EPOCH: (i32, u32, u32) = (1899, 12, 30);
/// 9999-12-31 对应的序列值
const MAX_SERIAL_DATE: f64 = 2_958_465.0;

#[derive(Debug, Deserialize)]
struct RosterWorkbook {
    #[serde(default)]
    sheets: BTreeMap<String, Vec<Vec<Value>>>,
}

/// 单个日期匹配规则，按顺序尝试，第一个成功的生效
#[derive(Debug, Clone, PartialEq)]
pub enum DateMatcher {
    /// chrono 格式字符串，例如 `%Y-%m-%d`
    Format(String),
    /// `2026-10-18T09:00:00` 或带时区的 RFC 3339
    IsoDateTime,
    /// 表格软件的序列日期（1899-12-30 起的天数）
    SpreadsheetSerial,
}

impl DateMatcher {
    pub fn matchers_for(formats: &[String]) -> Vec<DateMatcher> {
        let mut matchers: Vec<DateMatcher> =
            formats.iter().cloned().map(DateMatcher::Format).collect();
        matchers.push(DateMatcher::IsoDateTime);
        matchers.push(DateMatcher::SpreadsheetSerial);
        matchers
    }

    pub fn parse(&self, cell: &Value) -> Option<NaiveDate> {
        match (self, cell) {
            (DateMatcher::Format(format), Value::String(text)) => {
                let date = NaiveDate::parse_from_str(text.trim(), format).ok()?;
                // %Y 只接受四位年份，避免 "1/2/26" 被解析成公元26年
                if format.contains("%Y") && date.year() < 1000 {
                    return None;
                }
                Some(date)
            }
            (DateMatcher::IsoDateTime, Value::String(text)) => {
                let text = text.trim();
                DateTime::parse_from_rfc3339(text)
                    .map(|dt| dt.date_naive())
                    .or_else(|_| {
                        NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
                            .map(|dt| dt.date())
                    })
                    .or_else(|_| {
                        NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f")
                            .map(|dt| dt.date())
                    })
                    .ok()
            }
            (DateMatcher::SpreadsheetSerial, Value::Number(number)) => {
                let serial = number.as_f64()?;
                if !(1.0..=MAX_SERIAL_DATE).contains(&serial) {
                    return None;
                }
                let (y, m, d) = SERIAL_DATE_EPOCH;
                NaiveDate::from_ymd_opt(y, m, d)?
                    .checked_add_signed(Duration::days(serial.floor() as i64))
            }
            _ => None,
        }
    }
}

/// 把本地格式号码转换为 E.164
///
/// 只保留数字；以国内长途前缀开头且位数足够时，用国家代码替换前缀，否则返回 `None`。
pub fn normalize_phone(
    raw: &str,
    trunk_prefix: &str,
    country_code: &str,
    min_digits: usize,
) -> Option<String> {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() < min_digits {
        return None;
    }
    let national = digits.strip_prefix(trunk_prefix)?;
    Some(format!("{country_code}{national}"))
}

fn cell_text(cell: Option<&Value>) -> Option<String> {
    let text = match cell? {
        Value::Null => return None,
        Value::String(s) => s.trim().to_string(),
        other => other.to_string(),
    };
    (!text.is_empty()).then_some(text)
}

/// 名册读取器
pub struct RosterReader {
    store: Arc<dyn ObjectStore>,
    config: RosterConfig,
    date_matchers: Vec<DateMatcher>,
}

impl RosterReader {
    pub fn new(store: Arc<dyn ObjectStore>, config: RosterConfig) -> Self {
        let date_matchers = DateMatcher::matchers_for(&config.date_formats);
        Self {
            store,
            config,
            date_matchers,
        }
    }

    /// 从对象存储读取名册，按行顺序返回候选人
    pub async fn read(&self) -> EscalatorResult<Vec<Candidate>> {
        let body = self
            .store
            .get(&self.config.key)
            .await?
            .ok_or_else(|| EscalatorError::object_not_found(&self.config.key))?;
        let candidates = self.parse_workbook(&body)?;
        info!("候选人总数: {}", candidates.len());
        Ok(candidates)
    }

    pub fn parse_workbook(&self, body: &[u8]) -> EscalatorResult<Vec<Candidate>> {
        let workbook: RosterWorkbook = serde_json::from_slice(body)
            .map_err(|e| EscalatorError::RosterFormat(format!("名册解析失败: {e}")))?;
        let rows = workbook
            .sheets
            .get(&self.config.sheet)
            .ok_or_else(|| EscalatorError::SheetNotFound {
                sheet: self.config.sheet.clone(),
            })?;

        Ok(rows
            .iter()
            .enumerate()
            .skip(1)
            .filter_map(|(row_number, row)| self.candidate_from_row(row_number + 1, row))
            .collect())
    }

    fn candidate_from_row(&self, row_number: usize, row: &[Value]) -> Option<Candidate> {
        let Some(raw_phone) = cell_text(row.get(self.config.phone_column)) else {
            debug!("第{}行没有电话号码，跳过", row_number);
            return None;
        };
        let Some(phone) = normalize_phone(
            &raw_phone,
            &self.config.trunk_prefix,
            &self.config.country_code,
            self.config.min_digits,
        ) else {
            warn!("第{}行电话号码无法规范化，跳过: {}", row_number, raw_phone);
            return None;
        };

        let name = cell_text(row.get(self.config.name_column))
            .unwrap_or_else(|| self.config.unknown_name.clone());
        let scheduled_date = self.parse_date(row.get(self.config.date_column));
        if scheduled_date.is_none() {
            debug!("第{}行值班日期无法解析: {}", row_number, name);
        }

        Some(Candidate::new(name, phone, scheduled_date))
    }

    fn parse_date(&self, cell: Option<&Value>) -> Option<NaiveDate> {
        let cell = cell?;
        self.date_matchers.iter().find_map(|m| m.parse(cell))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn matchers() -> Vec<DateMatcher> {
        DateMatcher::matchers_for(&RosterConfig::default().date_formats)
    }

    fn parse(cell: Value) -> Option<NaiveDate> {
        matchers().iter().find_map(|m| m.parse(&cell))
    }

    #[test]
    fn test_normalize_phone() {
        assert_eq!(
            normalize_phone("090-1234-5678", "0", "+81", 10).as_deref(),
            Some("+819012345678")
        );
        assert_eq!(
            normalize_phone("03 1234 5678", "0", "+81", 10).as_deref(),
            Some("+81312345678")
        );
        // 位数不足
        assert_eq!(normalize_phone("012-345", "0", "+81", 10), None);
        // 不以长途前缀开头
        assert_eq!(normalize_phone("9012345678", "0", "+81", 10), None);
        assert_eq!(normalize_phone("", "0", "+81", 10), None);
    }

    #[test]
    fn test_date_formats_in_order() {
        let expected = NaiveDate::from_ymd_opt(2026, 10, 18);
        assert_eq!(parse(json!("2026-10-18")), expected);
        assert_eq!(parse(json!(" 10/18/2026 ")), expected);
        assert_eq!(parse(json!("10/18/26")), expected);
        assert_eq!(parse(json!("2026/10/18")), expected);
        assert_eq!(parse(json!("2026-10-18T09:30:00")), expected);
        assert_eq!(parse(json!("2026-10-18T09:30:00+09:00")), expected);
    }

    #[test]
    fn test_serial_dates() {
        assert_eq!(parse(json!(46313)), NaiveDate::from_ymd_opt(2026, 10, 18));
        assert_eq!(parse(json!(46313.75)), NaiveDate::from_ymd_opt(2026, 10, 18));
        assert_eq!(parse(json!(-3)), None);
    }

    #[test]
    fn test_unparseable_dates() {
        assert_eq!(parse(json!("明日")), None);
        assert_eq!(parse(json!("")), None);
        assert_eq!(parse(Value::Null), None);
        assert_eq!(parse(json!(true)), None);
    }

    #[test]
    fn test_cell_text() {
        assert_eq!(cell_text(Some(&json!("  山田 "))).as_deref(), Some("山田"));
        assert_eq!(cell_text(Some(&json!(12))).as_deref(), Some("12"));
        assert_eq!(cell_text(Some(&json!("   "))), None);
        assert_eq!(cell_text(Some(&Value::Null)), None);
        assert_eq!(cell_text(None), None);
    }
}
