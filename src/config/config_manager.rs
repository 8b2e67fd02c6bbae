// ==========================================
// 库存断货预测 - 配置管理器
// ==========================================
// 职责: 配置加载、校验、快照
// 存储: JSON 文件（可选）, 缺省为内置默认值
// ==========================================

use crate::config::forecast_config::ForecastConfig;
use crate::engine::error::{ForecastError, ForecastResult};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct ConfigManager {
    config: ForecastConfig,
}

impl ConfigManager {
    /// 使用已构造的配置（会先校验）
    pub fn new(config: ForecastConfig) -> ForecastResult<Self> {
        validate(&config)?;
        Ok(Self { config })
    }

    /// 从 JSON 字符串加载
    pub fn from_json_str(json: &str) -> ForecastResult<Self> {
        let config: ForecastConfig = serde_json::from_str(json)
            .map_err(|e| ForecastError::ConfigError(format!("配置 JSON 解析失败: {}", e)))?;
        Self::new(config)
    }

    /// 从 JSON 文件加载
    ///
    /// # 参数
    /// - path: 配置文件路径
    pub fn from_file<P: AsRef<Path>>(path: P) -> ForecastResult<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|e| {
            ForecastError::ConfigError(format!("配置文件读取失败 ({}): {}", path.display(), e))
        })?;

        let manager = Self::from_json_str(&raw)?;
        info!(path = %path.display(), "配置文件加载完成");
        Ok(manager)
    }

    /// 从环境变量指定的文件加载; 未设置时使用默认配置
    ///
    /// 仅供可执行程序使用, 库内部不读取环境变量
    pub fn from_env_or_default(var: &str) -> ForecastResult<Self> {
        match std::env::var(var) {
            Ok(path) if !path.trim().is_empty() => Self::from_file(path.trim()),
            _ => {
                debug!(var, "未指定配置文件, 使用默认配置");
                Ok(Self::default())
            }
        }
    }

    /// 当前配置
    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }

    /// 配置快照（JSON 格式, 随预测结果一起记录）
    pub fn get_config_snapshot(&self) -> ForecastResult<String> {
        serde_json::to_string(&self.config)
            .map_err(|e| ForecastError::ConfigError(format!("配置快照序列化失败: {}", e)))
    }
}

/// 配置校验
///
/// # 规则
/// - inventory_column 不可为空
/// - date_column_start_index 不可为 0（第 0 列固定为产品名）
/// - weeks_remaining_decimals <= 6
pub fn validate(config: &ForecastConfig) -> ForecastResult<()> {
    if config.inventory_column.trim().is_empty() {
        return Err(ForecastError::ConfigError(
            "inventory_column 不可为空".to_string(),
        ));
    }

    if config.date_column_start_index == Some(0) {
        return Err(ForecastError::ConfigError(
            "date_column_start_index 不可为 0（第 0 列为产品名列）".to_string(),
        ));
    }

    if config.weeks_remaining_decimals > 6 {
        return Err(ForecastError::ConfigError(format!(
            "weeks_remaining_decimals 超出范围: {}（最大 6）",
            config.weeks_remaining_decimals
        )));
    }

    Ok(())
}
