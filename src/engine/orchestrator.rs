// ==========================================
// 库存断货预测 - 引擎编排器
// ==========================================
// 用途: 协调四个阶段的执行顺序
// 流程: 周列识别 → 销量汇总 → 库存关联 → 断货预测
// 红线: 任一阶段结构性失败即整批失败, 不输出部分结果
// ==========================================

use crate::config::{ConfigManager, ForecastConfig};
use crate::domain::forecast::{DqSummary, DqViolation, ForecastReport, ForecastRow};
use crate::domain::table::RawTable;
use crate::domain::types::{DqLevel, StockStatus};
use crate::engine::error::ForecastResult;
use crate::engine::{ForecastCalculator, InventoryJoiner, SalesAggregator, SchemaDetector};
use crate::importer::{DataCleanerImpl, UniversalFileParser};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

// ==========================================
// ForecastOrchestrator - 引擎编排器
// ==========================================
// 无内部可变状态, 每次调用相互独立
pub struct ForecastOrchestrator {
    manager: ConfigManager,
    cleaner: DataCleanerImpl,
}

impl Default for ForecastOrchestrator {
    fn default() -> Self {
        Self::from_manager(&ConfigManager::default())
    }
}

impl ForecastOrchestrator {
    /// 创建编排器（配置先经校验）
    pub fn new(config: ForecastConfig) -> ForecastResult<Self> {
        let manager = ConfigManager::new(config)?;
        Ok(Self::from_manager(&manager))
    }

    /// 由已校验的配置管理器创建
    pub fn from_manager(manager: &ConfigManager) -> Self {
        Self {
            manager: manager.clone(),
            cleaner: DataCleanerImpl,
        }
    }

    pub fn config(&self) -> &ForecastConfig {
        self.manager.config()
    }

    /// 执行完整预测流程
    ///
    /// # 参数
    /// - sales: 周销量表（第 0 列为产品名）
    /// - inventory: 库存快照表（第 0 列为产品名, 含期末库存列）
    ///
    /// # 返回
    /// - Ok(ForecastReport): 预测行（按销量表行顺序）+ DQ 明细 + 汇总
    /// - Err(SchemaError / DateParseError): 整批失败
    #[instrument(skip_all, fields(run_id))]
    pub fn run(&self, sales: &RawTable, inventory: &RawTable) -> ForecastResult<ForecastReport> {
        let start_time = Instant::now();
        let config = self.manager.config();
        let run_id = Uuid::new_v4().to_string();
        tracing::Span::current().record("run_id", run_id.as_str());

        info!(
            sales_rows = sales.height(),
            inventory_rows = inventory.height(),
            "开始执行断货预测"
        );

        let mut violations: Vec<DqViolation> = Vec::new();

        // ==========================================
        // 步骤1: Schema Detector - 周日期列识别
        // ==========================================
        debug!("步骤1: 识别周日期列");

        let detector = SchemaDetector::from_config(config);
        let date_columns = detector.detect(&sales.headers)?;
        violations.extend(detector.layout_violations(&date_columns, &self.cleaner));

        info!(weeks = date_columns.len(), "周日期列识别完成");

        // ==========================================
        // 步骤2: Sales Aggregator - 锚点日期 + 销量汇总
        // ==========================================
        debug!("步骤2: 解析锚点日期并汇总销量");

        let aggregator = SalesAggregator::new(&self.cleaner, config.missing_value_policy);
        let anchor_date = aggregator.resolve_anchor_date(&date_columns)?;
        let (sales_records, sales_violations) = aggregator.aggregate(sales, &date_columns);
        violations.extend(sales_violations);

        info!(anchor_date = %anchor_date, records = sales_records.len(), "销量汇总完成");

        // ==========================================
        // 步骤3: Inventory Joiner - 库存左关联
        // ==========================================
        debug!("步骤3: 关联库存");

        let joiner = InventoryJoiner::new(&self.cleaner, &config.inventory_column);
        let (inventory_records, inventory_violations) = joiner.load_inventory(inventory)?;
        violations.extend(inventory_violations);

        let (joined, join_violations) = joiner.join(sales_records, &inventory_records);
        violations.extend(join_violations);

        let matched = joined.iter().filter(|j| j.matched).count();
        info!(matched, unmatched = joined.len() - matched, "库存关联完成");

        // ==========================================
        // 步骤4: Forecast Calculator - 断货预测
        // ==========================================
        debug!("步骤4: 计算剩余周数与断货日期");

        let calculator = ForecastCalculator::new(anchor_date, config.weeks_remaining_decimals);
        let (rows, calc_violations) = calculator.calculate(&joined);
        violations.extend(calc_violations);

        let summary = summarize(&rows, matched, &violations);
        if summary.warning > 0 {
            warn!(warning = summary.warning, "预测完成, 存在数据质量警告");
        }

        info!(
            total_rows = summary.total_rows,
            out_of_stock = summary.out_of_stock,
            no_forecast = summary.no_forecast,
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            "断货预测完成"
        );

        Ok(ForecastReport {
            run_id,
            config_snapshot: self.manager.get_config_snapshot()?,
            anchor_date,
            date_columns,
            rows,
            violations,
            summary,
        })
    }

    /// 从文件执行预测（CSV / Excel）
    ///
    /// 两个文件均完整读入内存后再计算
    pub fn run_files<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        sales_path: P,
        inventory_path: Q,
    ) -> ForecastResult<ForecastReport> {
        let parser = UniversalFileParser;

        info!(file = %sales_path.as_ref().display(), "读取销量表");
        let sales = parser.parse(sales_path)?;

        info!(file = %inventory_path.as_ref().display(), "读取库存表");
        let inventory = parser.parse(inventory_path)?;

        self.run(&sales, &inventory)
    }
}

/// 汇总统计
fn summarize(rows: &[ForecastRow], matched: usize, violations: &[DqViolation]) -> DqSummary {
    DqSummary {
        total_rows: rows.len(),
        matched,
        unmatched: rows.len() - matched,
        out_of_stock: rows
            .iter()
            .filter(|r| r.status == StockStatus::OutOfStock)
            .count(),
        no_forecast: rows.iter().filter(|r| r.weeks_remaining.is_none()).count(),
        warning: violations
            .iter()
            .filter(|v| v.level == DqLevel::Warning)
            .count(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::MissingValuePolicy;
    use crate::engine::error::ForecastError;
    use chrono::NaiveDate;

    fn sales_table() -> RawTable {
        RawTable::from_str_rows(
            &["Product", "Category", "3rd Mar 2025", "10th Mar 2025", "Items Sold"],
            &[
                &["Widget A", "x", "10", "10", "20"],
                &["Widget B", "x", "0", "0", "0"],
                &["Widget C", "y", "4", "", "4"],
                &["Widget D", "y", "6", "2", "8"],
            ],
        )
    }

    fn inventory_table() -> RawTable {
        RawTable::from_str_rows(
            &["Product", "Closing Inventory"],
            &[
                &["Widget A", "50"],
                &["Widget B", "12"],
                &["Widget C", "0"],
                &["Widget Z", "99"],
            ],
        )
    }

    #[test]
    fn test_full_pipeline() {
        let orchestrator = ForecastOrchestrator::default();
        let report = orchestrator.run(&sales_table(), &inventory_table()).unwrap();

        assert_eq!(report.anchor_date, NaiveDate::from_ymd_opt(2025, 3, 10).unwrap());
        assert_eq!(report.date_columns.len(), 2);
        assert_eq!(report.rows.len(), 4);

        let names: Vec<&str> = report.rows.iter().map(|r| r.product_name.as_str()).collect();
        assert_eq!(names, vec!["Widget A", "Widget B", "Widget C", "Widget D"]);

        let a = &report.rows[0];
        assert_eq!(a.weeks_remaining, Some(5.0));
        assert_eq!(a.runout_date_string(), "2025-04-14");

        let b = &report.rows[1];
        assert_eq!(b.weeks_remaining, None);
        assert_eq!(b.status, StockStatus::InStock);

        let c = &report.rows[2];
        assert_eq!(c.avg_weekly_sold, Some(4.0));
        assert_eq!(c.status, StockStatus::OutOfStock);

        let d = &report.rows[3];
        assert_eq!(d.closing_inventory, None);
        assert_eq!(d.weeks_remaining, None);
        assert_eq!(d.status, StockStatus::InStock);

        assert_eq!(report.summary.total_rows, 4);
        assert_eq!(report.summary.matched, 3);
        assert_eq!(report.summary.unmatched, 1);
        assert_eq!(report.summary.out_of_stock, 1);
        assert_eq!(report.summary.no_forecast, 2);
    }

    #[test]
    fn test_as_zero_policy_changes_average() {
        let config = ForecastConfig::default().with_missing_value_policy(MissingValuePolicy::AsZero);
        let orchestrator = ForecastOrchestrator::new(config).unwrap();
        let report = orchestrator.run(&sales_table(), &inventory_table()).unwrap();

        assert_eq!(report.rows[2].avg_weekly_sold, Some(2.0));

        // 报告携带本次运行的配置快照
        let snapshot: ForecastConfig = serde_json::from_str(&report.config_snapshot).unwrap();
        assert_eq!(snapshot.missing_value_policy, MissingValuePolicy::AsZero);
        assert_eq!(&snapshot, orchestrator.config());
    }

    #[test]
    fn test_missing_inventory_column_yields_no_output() {
        let inventory = RawTable::from_str_rows(&["Product", "Stock"], &[&["Widget A", "50"]]);
        let result = ForecastOrchestrator::default().run(&sales_table(), &inventory);
        assert!(matches!(result, Err(ForecastError::SchemaError(_))));
    }

    #[test]
    fn test_no_date_columns_is_schema_error() {
        let sales = RawTable::from_str_rows(&["Product", "Items Sold"], &[&["Widget A", "5"]]);
        let result = ForecastOrchestrator::default().run(&sales, &inventory_table());
        assert!(matches!(result, Err(ForecastError::SchemaError(_))));
    }

    #[test]
    fn test_unparseable_anchor_is_fatal() {
        let sales = RawTable::from_str_rows(
            &["Product", "3rd Mar 2025", "10th Mar 2025 (partial)"],
            &[&["Widget A", "1", "2"]],
        );
        let result = ForecastOrchestrator::default().run(&sales, &inventory_table());
        assert!(matches!(result, Err(ForecastError::DateParseError { .. })));
    }

    #[test]
    fn test_start_index_config() {
        let config = ForecastConfig::default().with_date_column_start_index(3);
        let orchestrator = ForecastOrchestrator::new(config).unwrap();
        let report = orchestrator.run(&sales_table(), &inventory_table()).unwrap();

        assert_eq!(report.date_columns.len(), 1);
        assert_eq!(report.date_columns[0].label, "10th Mar 2025");
        // 只统计 10th Mar 一周
        assert_eq!(report.rows[0].avg_weekly_sold, Some(10.0));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = ForecastConfig::default().with_date_column_start_index(0);
        assert!(matches!(
            ForecastOrchestrator::new(config),
            Err(ForecastError::ConfigError(_))
        ));
    }
}
