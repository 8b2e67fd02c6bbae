// ==========================================
// 库存断货预测 - 配置层
// ==========================================
// 职责: 预测配置加载与校验
// 存储: JSON 文件（可选）
// ==========================================

pub mod config_manager;
pub mod forecast_config;

// 重导出核心配置管理器
pub use config_manager::ConfigManager;
pub use forecast_config::ForecastConfig;

/// 可执行程序读取的配置文件路径环境变量
pub const CONFIG_ENV_VAR: &str = "RUNOUT_FORECAST_CONFIG";
