// ==========================================
// 库存断货预测 - 领域类型定义
// ==========================================
// 职责: 库存状态 / 缺失值口径 / DQ 级别
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 库存状态 (Stock Status)
// ==========================================
// 口径: 期末库存存在且 <= 0 才判定缺货
//       库存未知(未匹配/空值)一律视为有货
// 序列化格式: SCREAMING_SNAKE_CASE
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StockStatus {
    InStock,    // 有货
    OutOfStock, // 缺货
}

impl fmt::Display for StockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StockStatus::InStock => write!(f, "IN_STOCK"),
            StockStatus::OutOfStock => write!(f, "OUT_OF_STOCK"),
        }
    }
}

impl StockStatus {
    /// 按期末库存判定状态
    pub fn classify(closing_inventory: Option<f64>) -> Self {
        match closing_inventory {
            Some(qty) if qty <= 0.0 => StockStatus::OutOfStock,
            _ => StockStatus::InStock,
        }
    }

    /// 从导出字符串解析状态
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "IN_STOCK" => Some(StockStatus::InStock),
            "OUT_OF_STOCK" => Some(StockStatus::OutOfStock),
            _ => None,
        }
    }
}

// ==========================================
// 缺失值口径 (Missing Value Policy)
// ==========================================
// 仅影响平均周销量的分母; 合计始终把缺失视为 0
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MissingValuePolicy {
    #[default]
    Exclude, // 缺失周不计入分母
    AsZero,  // 缺失周按 0 计入分母
}

impl fmt::Display for MissingValuePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissingValuePolicy::Exclude => write!(f, "EXCLUDE"),
            MissingValuePolicy::AsZero => write!(f, "AS_ZERO"),
        }
    }
}

// ==========================================
// 数据质量级别 (DQ Level)
// ==========================================
// 结构性问题直接返回错误, 不进入 DQ 明细
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DqLevel {
    Warning, // 警告（该行降级输出）
    Info,    // 提示（仅记录）
}

impl fmt::Display for DqLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DqLevel::Warning => write!(f, "WARNING"),
            DqLevel::Info => write!(f, "INFO"),
        }
    }
}
