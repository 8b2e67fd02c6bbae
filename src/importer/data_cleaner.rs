// ==========================================
// 库存断货预测 - 数据清洗器实现
// ==========================================
// 职责: TRIM / NULL 标准化 / 数值解析 / 周表头日期解析
// ==========================================

use crate::importer::importer_trait::DataCleaner as DataCleanerTrait;
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

/// 序数后缀紧跟数字: 1st / 2nd / 3rd / 14th
static ORDINAL_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+)(st|nd|rd|th)").expect("ordinal regex"));

/// 周表头日期格式（序数后缀去除后）
pub const WEEK_DATE_FORMAT: &str = "%d %b %Y";

/// 视为空值的标记（与表格软件导出的缺失值一致）
const NULL_MARKERS: &[&str] = &["nan", "na", "n/a", "null", "none", "#n/a"];

pub struct DataCleaner;

impl DataCleanerTrait for DataCleaner {
    fn clean_text(&self, value: &str) -> String {
        value.trim().to_string()
    }

    fn normalize_null(&self, value: Option<&str>) -> Option<String> {
        value.and_then(|v| {
            let trimmed = v.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        })
    }

    fn parse_number(&self, value: Option<&str>) -> Result<Option<f64>, String> {
        let Some(raw) = self.normalize_null(value) else {
            return Ok(None);
        };

        if NULL_MARKERS.contains(&raw.to_lowercase().as_str()) {
            return Ok(None);
        }

        match raw.parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(Some(v)),
            _ => Err(raw),
        }
    }

    fn clean_date_label(&self, label: &str) -> String {
        ORDINAL_SUFFIX
            .replace_all(label.trim(), "$1")
            .into_owned()
    }

    fn parse_week_date(&self, label: &str) -> Result<NaiveDate, chrono::ParseError> {
        NaiveDate::parse_from_str(&self.clean_date_label(label), WEEK_DATE_FORMAT)
    }
}
