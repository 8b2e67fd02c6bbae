// ==========================================
// 库存断货预测 - 引擎错误类型
// ==========================================
// 口径: 结构性问题中止整批预测, 不输出部分结果
//       行级数值问题不报错, 记入 DQ 明细
// ==========================================

use crate::importer::error::ImportError;
use thiserror::Error;

/// 预测引擎错误类型
/// 错误信息必须指明出问题的列/值
#[derive(Error, Debug)]
pub enum ForecastError {
    // ===== 结构错误 =====
    #[error("表结构错误: {0}")]
    SchemaError(String),

    #[error("日期表头无法解析: '{label}'（清洗后 '{cleaned}'）, 期望格式如 '3rd Mar 2025'")]
    DateParseError { label: String, cleaned: String },

    // ===== 配置错误 =====
    #[error("配置错误: {0}")]
    ConfigError(String),

    // ===== 导入/导出错误 =====
    #[error(transparent)]
    ImportError(#[from] ImportError),

    #[error("导出失败: {0}")]
    ExportError(String),
}

impl From<csv::Error> for ForecastError {
    fn from(err: csv::Error) -> Self {
        ForecastError::ExportError(err.to_string())
    }
}

/// Result 类型别名
pub type ForecastResult<T> = Result<T, ForecastError>;
