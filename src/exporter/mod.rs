// ==========================================
// 库存断货预测 - 导出层
// ==========================================
// 职责: 预测结果 → CSV / JSON 报告
// ==========================================

pub mod csv_exporter;

use crate::domain::forecast::ForecastReport;
use crate::engine::error::{ForecastError, ForecastResult};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

pub use csv_exporter::{export_to_file, read_csv, to_csv_string, write_csv};

/// 完整报告（含 DQ 明细）导出为 JSON
pub fn export_report_json<P: AsRef<Path>>(report: &ForecastReport, path: P) -> ForecastResult<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| {
        ForecastError::ExportError(format!("无法创建文件 {}: {}", path.display(), e))
    })?;
    serde_json::to_writer_pretty(BufWriter::new(file), report)
        .map_err(|e| ForecastError::ExportError(e.to_string()))
}
