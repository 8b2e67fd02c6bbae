// ==========================================
// 库存断货预测 - 端到端测试
// ==========================================
// 流程: CSV 文件 → ForecastOrchestrator → CSV 导出 → 回读
// ==========================================


use chrono::NaiveDate;
use runout_forecast::config::ConfigManager;
use runout_forecast::exporter;
use runout_forecast::{
    logging, DqLevel, ForecastConfig, ForecastError, ForecastOrchestrator, ImportError,
    StockStatus,
};
use std::error::Error;

// ==========================================
// 测试1: 完整流程
// ==========================================
#[test]
fn test_e2e_forecast_from_csv_files() -> Result<(), Box<dyn Error>> {
    logging::init_test();

    let sales = test_helpers::create_sales_csv()?;
    let inventory = test_helpers::create_inventory_csv()?;

    let report = ForecastOrchestrator::default().run_files(sales.path(), inventory.path())?;

    // 锚点 = 最后一个周日期列
    assert_eq!(report.anchor_date, NaiveDate::from_ymd_opt(2025, 3, 17).unwrap());
    assert_eq!(report.date_columns.len(), 3);
    assert_eq!(report.date_columns[0].index, 7);

    // 行顺序 = 销量表行顺序, 库存表独有产品丢弃
    let names: Vec<&str> = report.rows.iter().map(|r| r.product_name.as_str()).collect();
    assert_eq!(names, vec!["Widget A", "Widget B", "Gadget C", "Gizmo D", "Sprocket E"]);

    // Widget A: 50 / 10 = 5 周 → 2025-03-17 + 35 天
    let a = &report.rows[0];
    assert_eq!(a.avg_weekly_sold, Some(10.0));
    assert_eq!(a.weeks_remaining, Some(5.0));
    assert_eq!(a.runout_date_string(), "2025-04-21");
    assert_eq!(a.status, StockStatus::InStock);

    // Widget B: 零销量, 无预测
    let b = &report.rows[1];
    assert_eq!(b.weeks_remaining, None);
    assert_eq!(b.runout_date_string(), "");

    // Gadget C: 库存 0 → 缺货; 缺失周不计入均值
    let c = &report.rows[2];
    assert_eq!(c.avg_weekly_sold, Some(6.0));
    assert_eq!(c.weeks_remaining, Some(0.0));
    assert_eq!(c.status, StockStatus::OutOfStock);

    // Gizmo D: 库存表无此产品 → 有货, 无预测
    let d = &report.rows[3];
    assert_eq!(d.closing_inventory, None);
    assert_eq!(d.weeks_remaining, None);
    assert_eq!(d.status, StockStatus::InStock);

    // Sprocket E: 产品名 TRIM 后匹配; "n/a" 视为缺失
    let e = &report.rows[4];
    assert_eq!(e.closing_inventory, Some(9.0));
    assert_eq!(e.avg_weekly_sold, Some(3.0));
    assert_eq!(e.weeks_remaining, Some(3.0));
    assert_eq!(e.runout_date_string(), "2025-04-07");

    assert_eq!(report.summary.matched, 4);
    assert_eq!(report.summary.unmatched, 1);
    assert_eq!(report.summary.out_of_stock, 1);
    assert!(report
        .violations
        .iter()
        .any(|v| v.level == DqLevel::Info && v.product_name.as_deref() == Some("Gizmo D")));

    Ok(())
}

// ==========================================
// 测试2: 导出 → 回读
// ==========================================
#[test]
fn test_e2e_export_roundtrip() -> Result<(), Box<dyn Error>> {
    let sales = test_helpers::create_sales_csv()?;
    let inventory = test_helpers::create_inventory_csv()?;
    let report = ForecastOrchestrator::default().run_files(sales.path(), inventory.path())?;

    let dir = tempfile::tempdir()?;
    let out = dir.path().join("runout_forecast.csv");
    exporter::export_to_file(&report.rows, &out)?;

    let parsed = exporter::read_csv(std::fs::File::open(&out)?)?;
    assert_eq!(parsed.len(), report.rows.len());
    for (original, reread) in report.rows.iter().zip(parsed.iter()) {
        assert_eq!(reread.product_name, original.product_name);
        assert_eq!(reread.closing_inventory, original.closing_inventory);
        assert_eq!(reread.weeks_remaining, original.weeks_remaining);
        assert_eq!(reread.status, original.status);
        assert_eq!(reread.runout_date_string(), original.runout_date_string());
    }

    Ok(())
}

// ==========================================
// 测试3: 固定起始列配置（H 列）
// ==========================================
#[test]
fn test_e2e_fixed_start_column() -> Result<(), Box<dyn Error>> {
    let sales = test_helpers::write_csv(&[
        "Product,1st Jan 2025,B,C,D,E,F,3rd Mar 2025,10th Mar 2025",
        "Widget A,1000,x,x,x,x,x,10,20",
    ])?;
    let inventory = test_helpers::create_inventory_csv()?;

    let manager = ConfigManager::from_json_str(r#"{"date_column_start_index": 7}"#)?;
    let report = ForecastOrchestrator::from_manager(&manager)
        .run_files(sales.path(), inventory.path())?;

    assert_eq!(report.date_columns.len(), 2);
    assert_eq!(report.rows[0].avg_weekly_sold, Some(15.0));

    // 不限制起始列时, 1st Jan 2025 也参与统计
    let report = ForecastOrchestrator::new(ForecastConfig::default())?
        .run_files(sales.path(), inventory.path())?;
    assert_eq!(report.date_columns.len(), 3);
    assert_eq!(report.rows[0].avg_weekly_sold, Some(1030.0 / 3.0));

    Ok(())
}

// ==========================================
// 测试4: 结构错误整批中止
// ==========================================
#[test]
fn test_e2e_missing_closing_inventory_column() -> Result<(), Box<dyn Error>> {
    let sales = test_helpers::create_sales_csv()?;
    let inventory = test_helpers::write_csv(&["Product,On Hand", "Widget A,50"])?;

    let result = ForecastOrchestrator::default().run_files(sales.path(), inventory.path());
    assert!(matches!(result, Err(ForecastError::SchemaError(_))));
    Ok(())
}

#[test]
fn test_e2e_no_date_columns() -> Result<(), Box<dyn Error>> {
    let sales = test_helpers::write_csv(&["Product,Items Sold", "Widget A,30"])?;
    let inventory = test_helpers::create_inventory_csv()?;

    let result = ForecastOrchestrator::default().run_files(sales.path(), inventory.path());
    assert!(matches!(result, Err(ForecastError::SchemaError(_))));
    Ok(())
}

#[test]
fn test_e2e_missing_file() {
    let result = ForecastOrchestrator::default().run_files("no_sales.csv", "no_stock.csv");
    assert!(matches!(
        result,
        Err(ForecastError::ImportError(ImportError::FileNotFound(_)))
    ));
}

// ==========================================
// 测试5: 乱序周列 → 锚点仍按位置, 记录警告
// ==========================================
#[test]
fn test_e2e_unsorted_week_columns_keep_positional_anchor() -> Result<(), Box<dyn Error>> {
    let sales = test_helpers::write_csv(&[
        "Product,17th Mar 2025,3rd Mar 2025",
        "Widget A,10,10",
    ])?;
    let inventory = test_helpers::create_inventory_csv()?;

    let report = ForecastOrchestrator::default().run_files(sales.path(), inventory.path())?;

    assert_eq!(report.anchor_date, NaiveDate::from_ymd_opt(2025, 3, 3).unwrap());
    assert_eq!(report.rows[0].runout_date_string(), "2025-04-07");
    assert!(report.summary.warning >= 1);
    Ok(())
}
