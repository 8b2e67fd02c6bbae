// ==========================================
// 库存断货预测 - CSV 导出
// ==========================================
// 格式: 表头 + 每产品一行, 行顺序 = 销量表行顺序
// - 数值: 普通十进制, 空值为 ""
// - 断货日期: YYYY-MM-DD, 空值为 ""
// - 状态: IN_STOCK / OUT_OF_STOCK
// ==========================================

use crate::domain::forecast::{columns, ForecastRow, RUNOUT_DATE_FORMAT};
use crate::domain::types::StockStatus;
use crate::engine::error::{ForecastError, ForecastResult};
use chrono::NaiveDate;
use csv::{ReaderBuilder, WriterBuilder};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tracing::info;

/// 数值格式化（f64 的 Display 不使用科学计数法）
fn format_number(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// 写出 CSV
pub fn write_csv<W: Write>(rows: &[ForecastRow], writer: W) -> ForecastResult<()> {
    let mut wtr = WriterBuilder::new().has_headers(false).from_writer(writer);

    wtr.write_record(columns::ALL)?;
    for row in rows {
        wtr.write_record([
            row.product_name.clone(),
            format_number(row.closing_inventory),
            format_number(row.avg_weekly_sold),
            format_number(row.weeks_remaining),
            row.runout_date_string(),
            row.status.to_string(),
        ])?;
    }

    wtr.flush()
        .map_err(|e| ForecastError::ExportError(e.to_string()))?;
    Ok(())
}

/// 导出为 CSV 字符串
pub fn to_csv_string(rows: &[ForecastRow]) -> ForecastResult<String> {
    let mut buf = Vec::new();
    write_csv(rows, &mut buf)?;
    String::from_utf8(buf).map_err(|e| ForecastError::ExportError(e.to_string()))
}

/// 导出到文件
pub fn export_to_file<P: AsRef<Path>>(rows: &[ForecastRow], path: P) -> ForecastResult<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| {
        ForecastError::ExportError(format!("无法创建文件 {}: {}", path.display(), e))
    })?;
    write_csv(rows, file)?;
    info!(file = %path.display(), rows = rows.len(), "预测结果已导出");
    Ok(())
}

/// 回读导出的 CSV
///
/// 表头必须与导出列完全一致, 否则 SchemaError
pub fn read_csv<R: Read>(reader: R) -> ForecastResult<Vec<ForecastRow>> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_reader(reader);

    let headers: Vec<String> = rdr.headers()?.iter().map(|h| h.trim().to_string()).collect();
    if headers != columns::ALL {
        return Err(ForecastError::SchemaError(format!(
            "预测结果表头不一致: {:?}",
            headers
        )));
    }

    let mut rows = Vec::new();
    for (idx, result) in rdr.records().enumerate() {
        let record = result?;
        let line = idx + 2;
        let field = |i: usize| record.get(i).unwrap_or("").trim();

        let status = StockStatus::from_str(field(5)).ok_or_else(|| {
            ForecastError::SchemaError(format!("第 {} 行状态无法识别: '{}'", line, field(5)))
        })?;

        rows.push(ForecastRow {
            product_name: field(0).to_string(),
            closing_inventory: parse_number(field(1), line, columns::CLOSING_INVENTORY)?,
            avg_weekly_sold: parse_number(field(2), line, columns::AVG_WEEKLY_SOLD)?,
            weeks_remaining: parse_number(field(3), line, columns::WEEKS_REMAINING)?,
            estimated_runout_date: parse_date(field(4), line)?,
            status,
        });
    }

    Ok(rows)
}

fn parse_number(value: &str, line: usize, column: &str) -> ForecastResult<Option<f64>> {
    if value.is_empty() {
        return Ok(None);
    }
    value.parse::<f64>().map(Some).map_err(|_| {
        ForecastError::SchemaError(format!("第 {} 行 '{}' 非数值: '{}'", line, column, value))
    })
}

fn parse_date(value: &str, line: usize) -> ForecastResult<Option<NaiveDate>> {
    if value.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(value, RUNOUT_DATE_FORMAT)
        .map(Some)
        .map_err(|_| ForecastError::DateParseError {
            label: format!("第 {} 行: {}", line, value),
            cleaned: value.to_string(),
        })
}
