// ==========================================
// 库存断货预测 - 销量汇总
// ==========================================
// 职责: 周销量列 → 每行合计 / 行内平均 + 锚点日期
// 输入: RawTable + Vec<DateColumn>
// 输出: Vec<SalesRecord>（保持源表行顺序）
// ==========================================
// 口径:
// - 合计: 缺失/非数值按 0
// - 平均: 行内（跨周列）均值, 分母由 MissingValuePolicy 决定
// - 锚点日期: 按列位置取最后一个周日期列, 不取时间最晚的一列
// ==========================================

use crate::domain::forecast::{DateColumn, DqViolation, SalesRecord, WeeklySale};
use crate::domain::table::RawTable;
use crate::domain::types::{DqLevel, MissingValuePolicy};
use crate::engine::error::{ForecastError, ForecastResult};
use crate::engine::schema_detector::PRODUCT_COLUMN_INDEX;
use crate::importer::importer_trait::DataCleaner;
use chrono::NaiveDate;
use std::collections::HashSet;
use tracing::{debug, instrument, warn};

// ==========================================
// SalesAggregator - 销量汇总器
// ==========================================
pub struct SalesAggregator<'a> {
    cleaner: &'a dyn DataCleaner,
    policy: MissingValuePolicy,
}

impl<'a> SalesAggregator<'a> {
    pub fn new(cleaner: &'a dyn DataCleaner, policy: MissingValuePolicy) -> Self {
        Self { cleaner, policy }
    }

    /// 解析锚点日期（最后一个周日期列）
    ///
    /// # 返回
    /// - Err(SchemaError): 无周日期列
    /// - Err(DateParseError): 最后一列表头无法按 "日 月份缩写 年" 解析
    pub fn resolve_anchor_date(&self, columns: &[DateColumn]) -> ForecastResult<NaiveDate> {
        let last = columns.last().ok_or_else(|| {
            ForecastError::SchemaError("销量表未找到周日期列".to_string())
        })?;

        self.cleaner.parse_week_date(&last.label).map_err(|_| {
            ForecastError::DateParseError {
                label: last.label.clone(),
                cleaned: self.cleaner.clean_date_label(&last.label),
            }
        })
    }

    /// 汇总销量表
    ///
    /// 每个数据行生成一条 SalesRecord, 不去重
    #[instrument(skip(self, table, columns), fields(rows = table.height(), weeks = columns.len()))]
    pub fn aggregate(
        &self,
        table: &RawTable,
        columns: &[DateColumn],
    ) -> (Vec<SalesRecord>, Vec<DqViolation>) {
        let mut records = Vec::with_capacity(table.height());
        let mut violations = Vec::new();
        let mut seen_names = HashSet::new();

        for row_idx in 0..table.height() {
            // 表头为第 1 行
            let row_number = row_idx + 2;
            let product_name = self
                .cleaner
                .clean_text(table.cell(row_idx, PRODUCT_COLUMN_INDEX).unwrap_or(""));

            if product_name.is_empty() {
                violations.push(sales_violation(
                    row_number,
                    None,
                    DqLevel::Warning,
                    table.headers.first().map(String::as_str).unwrap_or(""),
                    "产品名为空".to_string(),
                ));
            } else if !seen_names.insert(product_name.clone()) {
                violations.push(sales_violation(
                    row_number,
                    Some(&product_name),
                    DqLevel::Info,
                    table.headers.first().map(String::as_str).unwrap_or(""),
                    "销量表产品名重复, 各行分别输出".to_string(),
                ));
            }

            let mut weekly_sales = Vec::with_capacity(columns.len());
            for column in columns {
                let raw = table.cell(row_idx, column.index);
                let quantity = match self.cleaner.parse_number(raw) {
                    Ok(v) => v,
                    Err(bad) => {
                        violations.push(sales_violation(
                            row_number,
                            Some(&product_name),
                            DqLevel::Warning,
                            &column.label,
                            format!("周销量非数值, 按缺失处理: '{}'", bad),
                        ));
                        None
                    }
                };
                weekly_sales.push(WeeklySale {
                    week_label: column.label.clone(),
                    quantity,
                });
            }

            let (total_sold, avg_weekly_sold) = summarize(&weekly_sales, self.policy);

            records.push(SalesRecord {
                product_name,
                weekly_sales,
                total_sold,
                avg_weekly_sold,
                row_number,
            });
        }

        if !violations.is_empty() {
            warn!(count = violations.len(), "销量表存在数据质量问题");
        }
        debug!(records = records.len(), policy = %self.policy, "销量汇总完成");
        (records, violations)
    }
}

/// 计算合计与平均
///
/// # 规则
/// - total = Σ 有效值（缺失按 0）
/// - Exclude: avg = total / 有效周数; 有效周数为 0 时 None
/// - AsZero:  avg = total / 全部周数
pub fn summarize(weekly_sales: &[WeeklySale], policy: MissingValuePolicy) -> (f64, Option<f64>) {
    let present: Vec<f64> = weekly_sales.iter().filter_map(|w| w.quantity).collect();
    let total: f64 = present.iter().sum();

    let denominator = match policy {
        MissingValuePolicy::Exclude => present.len(),
        MissingValuePolicy::AsZero => weekly_sales.len(),
    };

    let avg = if denominator == 0 {
        None
    } else {
        Some(total / denominator as f64)
    };

    (total, avg)
}

fn sales_violation(
    row_number: usize,
    product_name: Option<&str>,
    level: DqLevel,
    field: &str,
    message: String,
) -> DqViolation {
    DqViolation {
        source: "sales".to_string(),
        row_number: Some(row_number),
        product_name: product_name.map(str::to_string),
        level,
        field: field.to_string(),
        message,
    }
}
