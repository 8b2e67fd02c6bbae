// ==========================================
// 库存断货预测 - 周销量列识别
// ==========================================
// 职责: 从销量表表头识别周日期列
// 输入: 表头（按源列顺序）
// 输出: Vec<DateColumn>（按源列顺序, 不按日期排序）
// ==========================================
// 规则:
// - 第 0 列固定为产品名列, 不参与识别
// - 表头匹配 "1~2 位数字 [st|nd|rd|th] 空白 月份单词 空白 4 位年"
// - 可配置起始列, 起始列之前的列不参与识别
// - 未识别到任何列 → SchemaError（整批中止）
// ==========================================

use crate::config::ForecastConfig;
use crate::domain::forecast::{DateColumn, DqViolation};
use crate::domain::types::DqLevel;
use crate::engine::error::{ForecastError, ForecastResult};
use crate::importer::importer_trait::DataCleaner;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, instrument};

/// 周表头匹配（前缀匹配, 尾部多余文字留给日期解析阶段报错）
static WEEK_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{1,2}(?:st|nd|rd|th)?\s+[A-Za-z]+\s+\d{4}").expect("week header regex")
});

/// 产品名列位置
pub const PRODUCT_COLUMN_INDEX: usize = 0;

// ==========================================
// SchemaDetector - 周销量列识别器
// ==========================================
pub struct SchemaDetector {
    date_column_start_index: Option<usize>,
}

impl SchemaDetector {
    pub fn new(date_column_start_index: Option<usize>) -> Self {
        Self {
            date_column_start_index,
        }
    }

    pub fn from_config(config: &ForecastConfig) -> Self {
        Self::new(config.date_column_start_index)
    }

    /// 表头是否为周日期列
    pub fn is_week_header(header: &str) -> bool {
        WEEK_HEADER.is_match(header.trim())
    }

    /// 识别周日期列
    ///
    /// # 返回
    /// - Ok(Vec<DateColumn>): 至少一列
    /// - Err(SchemaError): 未识别到任何周日期列
    #[instrument(skip(self, headers), fields(columns = headers.len()))]
    pub fn detect(&self, headers: &[String]) -> ForecastResult<Vec<DateColumn>> {
        let start = self
            .date_column_start_index
            .unwrap_or(PRODUCT_COLUMN_INDEX + 1)
            .max(PRODUCT_COLUMN_INDEX + 1);

        let detected: Vec<DateColumn> = headers
            .iter()
            .enumerate()
            .skip(start)
            .filter(|(_, header)| Self::is_week_header(header))
            .map(|(index, header)| DateColumn {
                index,
                label: header.trim().to_string(),
            })
            .collect();

        if detected.is_empty() {
            return Err(ForecastError::SchemaError(match self.date_column_start_index {
                Some(idx) => format!("销量表第 {} 列及之后未找到周日期列（如 '3rd Mar 2025'）", idx),
                None => "销量表未找到周日期列（如 '3rd Mar 2025'）".to_string(),
            }));
        }

        debug!(
            detected = detected.len(),
            first = %detected[0].label,
            last = %detected[detected.len() - 1].label,
            "周日期列识别完成"
        );
        Ok(detected)
    }

    /// 列布局检查（只记录, 不改变锚点口径）
    ///
    /// - 日期列不连续（中间夹杂其他列）→ INFO
    /// - 日期列未按时间升序排列 → WARNING（锚点取最后一列, 可能不是最新一周）
    pub fn layout_violations(
        &self,
        columns: &[DateColumn],
        cleaner: &dyn DataCleaner,
    ) -> Vec<DqViolation> {
        let mut violations = Vec::new();

        for pair in columns.windows(2) {
            if pair[1].index != pair[0].index + 1 {
                violations.push(header_violation(
                    DqLevel::Info,
                    &pair[1].label,
                    format!(
                        "周日期列不连续: 第 {} 列与第 {} 列之间存在其他列",
                        pair[0].index, pair[1].index
                    ),
                ));
            }
        }

        // 非锚点列解析失败不报错, 仅跳过排序检查
        let dates: Vec<_> = columns
            .iter()
            .filter_map(|c| cleaner.parse_week_date(&c.label).ok().map(|d| (c, d)))
            .collect();

        for pair in dates.windows(2) {
            let ((prev_col, prev_date), (col, date)) = (pair[0], pair[1]);
            if date <= prev_date {
                violations.push(header_violation(
                    DqLevel::Warning,
                    &col.label,
                    format!(
                        "周日期列未按时间升序: '{}' 位于 '{}' 之后, 锚点日期仍取最后一列",
                        col.label, prev_col.label
                    ),
                ));
            }
        }

        violations
    }
}

fn header_violation(level: DqLevel, field: &str, message: String) -> DqViolation {
    DqViolation {
        source: "sales".to_string(),
        row_number: None,
        product_name: None,
        level,
        field: field.to_string(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::importer::DataCleanerImpl;

    fn headers(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_detects_ordinal_headers_in_order() {
        let detector = SchemaDetector::new(None);
        let cols = detector
            .detect(&headers(&["Product", "3rd Mar 2025", "10th Mar 2025"]))
            .unwrap();

        assert_eq!(cols.len(), 2);
        assert_eq!(cols[0], DateColumn { index: 1, label: "3rd Mar 2025".to_string() });
        assert_eq!(cols[1], DateColumn { index: 2, label: "10th Mar 2025".to_string() });
    }

    #[test]
    fn test_header_pattern() {
        assert!(SchemaDetector::is_week_header("14 Jul 2025"));
        assert!(SchemaDetector::is_week_header("1st Jun 2025"));
        assert!(SchemaDetector::is_week_header("22nd December 2024"));
        assert!(!SchemaDetector::is_week_header("Items Sold"));
        assert!(!SchemaDetector::is_week_header("2025-03-03"));
        assert!(!SchemaDetector::is_week_header("123 Mar 2025"));
        assert!(!SchemaDetector::is_week_header("3 Mar 25"));
    }

    #[test]
    fn test_ignores_non_date_columns_and_keeps_source_order() {
        let detector = SchemaDetector::new(None);
        let cols = detector
            .detect(&headers(&[
                "Product",
                "SKU",
                "17th Mar 2025",
                "3rd Mar 2025",
                "Items Sold",
            ]))
            .unwrap();

        let labels: Vec<&str> = cols.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["17th Mar 2025", "3rd Mar 2025"]);
    }

    #[test]
    fn test_first_column_is_never_a_date_column() {
        let detector = SchemaDetector::new(None);
        let cols = detector
            .detect(&headers(&["3rd Mar 2025", "10th Mar 2025"]))
            .unwrap();
        assert_eq!(cols.len(), 1);
        assert_eq!(cols[0].index, 1);
    }

    #[test]
    fn test_start_index_restricts_detection() {
        let detector = SchemaDetector::new(Some(3));
        let cols = detector
            .detect(&headers(&[
                "Product",
                "3rd Mar 2025",
                "Category",
                "10th Mar 2025",
                "17th Mar 2025",
            ]))
            .unwrap();

        let indexes: Vec<usize> = cols.iter().map(|c| c.index).collect();
        assert_eq!(indexes, vec![3, 4]);
    }

    #[test]
    fn test_no_date_columns_is_schema_error() {
        let detector = SchemaDetector::new(None);
        let result = detector.detect(&headers(&["Product", "Items Sold"]));
        assert!(matches!(result, Err(ForecastError::SchemaError(_))));

        let detector = SchemaDetector::new(Some(5));
        let result = detector.detect(&headers(&["Product", "3rd Mar 2025"]));
        assert!(matches!(result, Err(ForecastError::SchemaError(_))));
    }

    #[test]
    fn test_layout_violations() {
        let detector = SchemaDetector::new(None);
        let cols = detector
            .detect(&headers(&[
                "Product",
                "10th Mar 2025",
                "Notes",
                "3rd Mar 2025",
            ]))
            .unwrap();

        let violations = detector.layout_violations(&cols, &DataCleanerImpl);
        assert_eq!(violations.len(), 2);
        assert_eq!(violations[0].level, DqLevel::Info);
        assert_eq!(violations[1].level, DqLevel::Warning);
        assert_eq!(violations[1].field, "3rd Mar 2025");
    }

    #[test]
    fn test_layout_ok_for_ascending_contiguous_columns() {
        let detector = SchemaDetector::new(None);
        let cols = detector
            .detect(&headers(&["Product", "3rd Mar 2025", "10th Mar 2025"]))
            .unwrap();
        assert!(detector.layout_violations(&cols, &DataCleanerImpl).is_empty());
    }
}
