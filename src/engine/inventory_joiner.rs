// ==========================================
// 库存断货预测 - 库存关联
// ==========================================
// 职责: 库存表 → InventoryRecord, 与 SalesRecord 左关联
// 口径:
// - 关联键: TRIM 后的产品名, 精确匹配（区分大小写）
// - 保留全部销量行, 未匹配行库存为空
// - 仅出现在库存表的产品丢弃
// - 库存表产品名重复时取第一条
// - 库存表缺少期末库存列 → SchemaError（整批中止）
// ==========================================

use crate::domain::forecast::{DqViolation, InventoryRecord, JoinedRecord, SalesRecord};
use crate::domain::table::RawTable;
use crate::domain::types::DqLevel;
use crate::engine::error::{ForecastError, ForecastResult};
use crate::engine::schema_detector::PRODUCT_COLUMN_INDEX;
use crate::importer::importer_trait::DataCleaner;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use tracing::{debug, instrument};

// ==========================================
// InventoryJoiner - 库存关联器
// ==========================================
pub struct InventoryJoiner<'a> {
    cleaner: &'a dyn DataCleaner,
    inventory_column: &'a str,
}

impl<'a> InventoryJoiner<'a> {
    pub fn new(cleaner: &'a dyn DataCleaner, inventory_column: &'a str) -> Self {
        Self {
            cleaner,
            inventory_column,
        }
    }

    /// 读取库存表
    ///
    /// # 返回
    /// - Err(SchemaError): 缺少期末库存列
    #[instrument(skip(self, table), fields(rows = table.height()))]
    pub fn load_inventory(
        &self,
        table: &RawTable,
    ) -> ForecastResult<(Vec<InventoryRecord>, Vec<DqViolation>)> {
        let inventory_idx = table.column_index(self.inventory_column).ok_or_else(|| {
            ForecastError::SchemaError(format!(
                "库存表缺少 '{}' 列",
                self.inventory_column
            ))
        })?;

        let mut records = Vec::with_capacity(table.height());
        let mut violations = Vec::new();

        for row_idx in 0..table.height() {
            let row_number = row_idx + 2;
            let product_name = self
                .cleaner
                .clean_text(table.cell(row_idx, PRODUCT_COLUMN_INDEX).unwrap_or(""));

            if product_name.is_empty() {
                violations.push(inventory_violation(
                    row_number,
                    None,
                    DqLevel::Info,
                    table.headers.first().map(String::as_str).unwrap_or(""),
                    "库存表产品名为空, 该行不参与关联".to_string(),
                ));
                continue;
            }

            let closing_inventory =
                match self.cleaner.parse_number(table.cell(row_idx, inventory_idx)) {
                    Ok(v) => v,
                    Err(bad) => {
                        violations.push(inventory_violation(
                            row_number,
                            Some(&product_name),
                            DqLevel::Warning,
                            self.inventory_column,
                            format!("期末库存非数值, 按缺失处理: '{}'", bad),
                        ));
                        None
                    }
                };

            records.push(InventoryRecord {
                product_name,
                closing_inventory,
                row_number,
            });
        }

        debug!(records = records.len(), "库存表读取完成");
        Ok((records, violations))
    }

    /// 左关联（以销量表为准）
    #[instrument(skip_all, fields(sales = sales.len(), inventory = inventory.len()))]
    pub fn join(
        &self,
        sales: Vec<SalesRecord>,
        inventory: &[InventoryRecord],
    ) -> (Vec<JoinedRecord>, Vec<DqViolation>) {
        let mut violations = Vec::new();
        let mut index: HashMap<&str, &InventoryRecord> = HashMap::with_capacity(inventory.len());

        for record in inventory {
            match index.entry(record.product_name.as_str()) {
                Entry::Vacant(slot) => {
                    slot.insert(record);
                }
                Entry::Occupied(first) => {
                    violations.push(inventory_violation(
                        record.row_number,
                        Some(&record.product_name),
                        DqLevel::Warning,
                        self.inventory_column,
                        format!(
                            "库存表产品名重复, 使用第 {} 行",
                            first.get().row_number
                        ),
                    ));
                }
            }
        }

        let joined: Vec<JoinedRecord> = sales
            .into_iter()
            .map(|sales| match index.get(sales.product_name.as_str()) {
                Some(inv) => JoinedRecord {
                    closing_inventory: inv.closing_inventory,
                    matched: true,
                    sales,
                },
                None => {
                    violations.push(DqViolation {
                        source: "sales".to_string(),
                        row_number: Some(sales.row_number),
                        product_name: Some(sales.product_name.clone()),
                        level: DqLevel::Info,
                        field: self.inventory_column.to_string(),
                        message: "库存表无此产品, 库存按未知处理".to_string(),
                    });
                    JoinedRecord {
                        closing_inventory: None,
                        matched: false,
                        sales,
                    }
                }
            })
            .collect();

        debug!(
            matched = joined.iter().filter(|j| j.matched).count(),
            "库存关联完成"
        );
        (joined, violations)
    }
}

fn inventory_violation(
    row_number: usize,
    product_name: Option<&str>,
    level: DqLevel,
    field: &str,
    message: String,
) -> DqViolation {
    DqViolation {
        source: "inventory".to_string(),
        row_number: Some(row_number),
        product_name: product_name.map(str::to_string),
        level,
        field: field.to_string(),
        message,
    }
}
