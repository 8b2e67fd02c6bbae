// ==========================================
// 库存断货预测 - 引擎层
// ==========================================
// 职责: 周列识别 / 销量汇总 / 库存关联 / 断货预测
// 红线: 纯计算, 不读写文件; 单线程同步执行
// ==========================================

pub mod error;
pub mod forecast_calculator;
pub mod inventory_joiner;
pub mod orchestrator;
pub mod sales_aggregator;
pub mod schema_detector;

// 重导出核心引擎
pub use error::{ForecastError, ForecastResult};
pub use forecast_calculator::ForecastCalculator;
pub use inventory_joiner::InventoryJoiner;
pub use orchestrator::ForecastOrchestrator;
pub use sales_aggregator::SalesAggregator;
pub use schema_detector::SchemaDetector;
