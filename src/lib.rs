// ==========================================
// 库存断货预测 - 核心库
// ==========================================
// 输入: 周销量表 + 期末库存表
// 输出: 每产品剩余周数 / 预计断货日期 / 库存状态
// 系统定位: 纯计算内核, 展示与交互由调用方负责
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 表格与记录
pub mod domain;

// 引擎层 - 预测流程
pub mod engine;

// 导入层 - CSV / Excel
pub mod importer;

// 导出层 - CSV / JSON
pub mod exporter;

// 配置层
pub mod config;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

pub use config::{ConfigManager, ForecastConfig};
pub use domain::{
    DateColumn, DqLevel, DqSummary, DqViolation, ForecastReport, ForecastRow, InventoryRecord,
    MissingValuePolicy, RawTable, SalesRecord, StockStatus,
};
pub use engine::{ForecastError, ForecastOrchestrator, ForecastResult};
pub use importer::{ImportError, UniversalFileParser};

// ==========================================
// 便捷入口
// ==========================================

/// 使用默认配置执行一次预测
pub fn forecast(sales: &RawTable, inventory: &RawTable) -> ForecastResult<ForecastReport> {
    ForecastOrchestrator::default().run(sales, inventory)
}

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "库存断货预测";
