// ==========================================
// 库存断货预测 - 命令行入口
// ==========================================
// 用法:
//   runout-forecast <销量表> <库存表> [输出文件]
// - 输出文件为 .json 时写出完整报告（含 DQ 明细）
// - 输出文件为其他扩展名时写出 CSV
// - 省略输出文件时 CSV 写到 stdout
// 配置: 环境变量 RUNOUT_FORECAST_CONFIG 指定 JSON 配置文件
// 日志: RUNOUT_FORECAST_LOG_FORMAT=json 输出 JSON 日志（写 stderr）
// ==========================================

use anyhow::{bail, Context};
use runout_forecast::config::{ConfigManager, CONFIG_ENV_VAR};
use runout_forecast::{exporter, logging, ForecastOrchestrator};
use std::path::PathBuf;

fn main() -> anyhow::Result<()> {
    logging::init_from_env();

    let mut args = std::env::args().skip(1);
    let (sales_path, inventory_path) = match (args.next(), args.next()) {
        (Some(sales), Some(inventory)) => (PathBuf::from(sales), PathBuf::from(inventory)),
        _ => bail!("用法: runout-forecast <销量表.csv|xlsx> <库存表.csv|xlsx> [输出.csv|json]"),
    };
    let output_path = args.next().map(PathBuf::from);

    tracing::info!("{} v{}", runout_forecast::APP_NAME, runout_forecast::VERSION);

    let manager = ConfigManager::from_env_or_default(CONFIG_ENV_VAR)
        .context("加载配置失败")?;
    let orchestrator = ForecastOrchestrator::from_manager(&manager);

    let report = orchestrator
        .run_files(&sales_path, &inventory_path)
        .context("断货预测失败")?;

    for violation in &report.violations {
        tracing::warn!(
            dq_level = %violation.level,
            source = %violation.source,
            row = ?violation.row_number,
            field = %violation.field,
            "{}",
            violation.message
        );
    }

    match output_path {
        Some(path) if path.extension().is_some_and(|e| e.eq_ignore_ascii_case("json")) => {
            exporter::export_report_json(&report, &path)?;
        }
        Some(path) => exporter::export_to_file(&report.rows, &path)?,
        None => exporter::write_csv(&report.rows, std::io::stdout().lock())?,
    }

    Ok(())
}
