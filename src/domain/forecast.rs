// ==========================================
// 库存断货预测 - 预测领域模型
// ==========================================
// 数据流: RawTable → SalesRecord / InventoryRecord
//         → JoinedRecord → ForecastRow → ForecastReport
// 生命周期: 单次预测内构造, 导出后丢弃
// ==========================================

use crate::domain::types::{DqLevel, StockStatus};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ===== 输出列名 =====
pub mod columns {
    pub const PRODUCT_NAME: &str = "Product Name";
    pub const CLOSING_INVENTORY: &str = "Closing Inventory";
    pub const AVG_WEEKLY_SOLD: &str = "Avg Weekly Sold";
    pub const WEEKS_REMAINING: &str = "Weeks Remaining";
    pub const ESTIMATED_RUNOUT_DATE: &str = "Estimated Run-Out Date";
    pub const STATUS: &str = "Status";

    /// 输出表列顺序
    pub const ALL: [&str; 6] = [
        PRODUCT_NAME,
        CLOSING_INVENTORY,
        AVG_WEEKLY_SOLD,
        WEEKS_REMAINING,
        ESTIMATED_RUNOUT_DATE,
        STATUS,
    ];
}

/// 导出日期格式
pub const RUNOUT_DATE_FORMAT: &str = "%Y-%m-%d";

// ==========================================
// DateColumn - 识别出的周销量列
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateColumn {
    pub index: usize,  // 源表列位置
    pub label: String, // 原始表头, 如 "3rd Mar 2025"
}

// ==========================================
// WeeklySale - 单周销量
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklySale {
    pub week_label: String,
    pub quantity: Option<f64>, // 缺失/非数值为 None
}

// ==========================================
// SalesRecord - 销量汇总（每个销量行一条）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesRecord {
    pub product_name: String,           // TRIM 后的产品名（关联键）
    pub weekly_sales: Vec<WeeklySale>,  // 按列位置排序
    pub total_sold: f64,                // 合计（缺失按 0）
    pub avg_weekly_sold: Option<f64>,   // 行内均值; 无有效周时为 None
    pub row_number: usize,              // 源文件行号（表头为第 1 行）
}

// ==========================================
// InventoryRecord - 库存快照（每个库存行一条）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryRecord {
    pub product_name: String,
    pub closing_inventory: Option<f64>,
    pub row_number: usize,
}

// ==========================================
// JoinedRecord - 左关联结果
// ==========================================
// 未匹配库存时 closing_inventory = None, matched = false
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinedRecord {
    pub sales: SalesRecord,
    pub closing_inventory: Option<f64>,
    pub matched: bool,
}

// ==========================================
// ForecastRow - 预测输出行
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastRow {
    pub product_name: String,
    pub closing_inventory: Option<f64>,
    pub avg_weekly_sold: Option<f64>,
    pub weeks_remaining: Option<f64>,
    pub estimated_runout_date: Option<NaiveDate>,
    pub status: StockStatus,
}

impl ForecastRow {
    /// 导出用日期字符串（空值为 ""）
    pub fn runout_date_string(&self) -> String {
        self.estimated_runout_date
            .map(|d| d.format(RUNOUT_DATE_FORMAT).to_string())
            .unwrap_or_default()
    }
}

// ==========================================
// DqViolation - 数据质量记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DqViolation {
    pub source: String,               // "sales" / "inventory"
    pub row_number: Option<usize>,    // 源文件行号（表头级问题为 None）
    pub product_name: Option<String>, // 产品名（如果可解析）
    pub level: DqLevel,
    pub field: String,                // 相关列
    pub message: String,
}

// ==========================================
// DqSummary - 预测汇总
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DqSummary {
    pub total_rows: usize,   // 输出行数
    pub matched: usize,      // 匹配到库存
    pub unmatched: usize,    // 未匹配库存
    pub out_of_stock: usize, // 缺货
    pub no_forecast: usize,  // 无法计算剩余周数
    pub warning: usize,      // WARNING 条数
}

// ==========================================
// ForecastReport - 单次预测结果
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastReport {
    pub run_id: String,
    pub config_snapshot: String, // 本次运行使用的配置（JSON）
    pub anchor_date: NaiveDate,
    pub date_columns: Vec<DateColumn>,
    pub rows: Vec<ForecastRow>,
    pub violations: Vec<DqViolation>,
    pub summary: DqSummary,
}
