// ==========================================
// 库存断货预测 - 导入 Trait
// ==========================================
// 职责: 定义文件解析 / 单元格清洗接口（不包含实现）
// ==========================================

use crate::domain::table::RawTable;
use crate::importer::error::ImportResult;
use chrono::NaiveDate;
use std::path::Path;

// ==========================================
// FileParser Trait
// ==========================================
// 用途: 文件 → RawTable
// 实现者: CsvParser, ExcelParser
pub trait FileParser: Send + Sync {
    /// 解析文件为按列位置保存的原始表
    ///
    /// # 参数
    /// - file_path: 文件路径
    ///
    /// # 返回
    /// - Ok(RawTable): 表头 + 数据行（已跳过全空行）
    /// - Err: 文件不存在、格式不支持、解析失败
    fn parse_to_table(&self, file_path: &Path) -> ImportResult<RawTable>;
}

// ==========================================
// DataCleaner Trait
// ==========================================
// 用途: 单元格清洗接口
// 实现者: DataCleanerImpl
pub trait DataCleaner: Send + Sync {
    /// TRIM
    fn clean_text(&self, value: &str) -> String;

    /// 空白 → None
    fn normalize_null(&self, value: Option<&str>) -> Option<String>;

    /// 解析数值单元格
    ///
    /// # 返回
    /// - Ok(Some(v)): 有效数值
    /// - Ok(None): 空值 / NaN 标记
    /// - Err(raw): 非数值（调用方记 DQ 警告并按缺失处理）
    fn parse_number(&self, value: Option<&str>) -> Result<Option<f64>, String>;

    /// 去除序数后缀: "3rd Mar 2025" → "3 Mar 2025"
    fn clean_date_label(&self, label: &str) -> String;

    /// 解析周表头日期（日 月份缩写 四位年）
    fn parse_week_date(&self, label: &str) -> Result<NaiveDate, chrono::ParseError>;
}
