// ==========================================
// 库存断货预测 - 领域模型层
// ==========================================
// 职责: 定义表格、记录、枚举类型
// 红线: 不含文件读写逻辑, 不含计算逻辑
// ==========================================

pub mod forecast;
pub mod table;
pub mod types;

// 重导出核心类型
pub use forecast::{
    columns, DateColumn, DqSummary, DqViolation, ForecastReport, ForecastRow, InventoryRecord,
    JoinedRecord, SalesRecord, WeeklySale, RUNOUT_DATE_FORMAT,
};
pub use table::RawTable;
pub use types::{DqLevel, MissingValuePolicy, StockStatus};
