// ==========================================
// 库存断货预测 - 原始表格模型
// ==========================================
// 职责: 按列位置保存表头与单元格(不做类型推断)
// 用途: 导入层写入, 引擎层只读
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// RawTable - 原始二维表
// ==========================================
// 列顺序即源文件列顺序; 周销量列的"最后一列"按位置定义
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawTable {
    pub headers: Vec<String>,   // 表头（已 TRIM）
    pub rows: Vec<Vec<String>>, // 数据行（行长度可能短于表头）
}

impl RawTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    /// 便于测试/调用方直接由字面量构造
    pub fn from_str_rows(headers: &[&str], rows: &[&[&str]]) -> Self {
        Self {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: rows
                .iter()
                .map(|row| row.iter().map(|c| c.to_string()).collect())
                .collect(),
        }
    }

    /// 数据行数
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// 列数（以表头为准）
    pub fn width(&self) -> usize {
        self.headers.len()
    }

    /// 按表头精确查找列位置（表头已 TRIM）
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// 读取单元格; 越界视为空
    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(|c| c.as_str())
    }
}
