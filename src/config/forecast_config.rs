use crate::domain::forecast::columns;
use crate::domain::types::MissingValuePolicy;
use serde::{Deserialize, Serialize};

/// 预测配置（单次预测只读）
///
/// 可由 JSON 文件加载, 缺省字段取默认值。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastConfig {
    /// 周销量列起始位置（0 基）
    ///
    /// - None: 扫描全部列（第 0 列除外）
    /// - Some(n): 只识别第 n 列及之后的列（如固定从 H 列开始则为 7）
    #[serde(default)]
    pub date_column_start_index: Option<usize>,

    /// 平均周销量的缺失值口径
    #[serde(default)]
    pub missing_value_policy: MissingValuePolicy,

    /// 库存表中期末库存列的表头
    #[serde(default = "default_inventory_column")]
    pub inventory_column: String,

    /// 剩余周数保留小数位
    #[serde(default = "default_weeks_remaining_decimals")]
    pub weeks_remaining_decimals: u32,
}

fn default_inventory_column() -> String {
    columns::CLOSING_INVENTORY.to_string()
}

fn default_weeks_remaining_decimals() -> u32 {
    1
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            date_column_start_index: None,
            missing_value_policy: MissingValuePolicy::default(),
            inventory_column: default_inventory_column(),
            weeks_remaining_decimals: default_weeks_remaining_decimals(),
        }
    }
}

impl ForecastConfig {
    /// 设置周销量列起始位置
    pub fn with_date_column_start_index(mut self, index: usize) -> Self {
        self.date_column_start_index = Some(index);
        self
    }

    /// 设置缺失值口径
    pub fn with_missing_value_policy(mut self, policy: MissingValuePolicy) -> Self {
        self.missing_value_policy = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ForecastConfig::default();
        assert_eq!(config.date_column_start_index, None);
        assert_eq!(config.missing_value_policy, MissingValuePolicy::Exclude);
        assert_eq!(config.inventory_column, "Closing Inventory");
        assert_eq!(config.weeks_remaining_decimals, 1);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: ForecastConfig =
            serde_json::from_str(r#"{"date_column_start_index": 7}"#).unwrap();
        assert_eq!(config.date_column_start_index, Some(7));
        assert_eq!(config.inventory_column, "Closing Inventory");
        assert_eq!(config.weeks_remaining_decimals, 1);
    }
}
