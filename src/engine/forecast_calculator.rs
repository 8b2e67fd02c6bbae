// ==========================================
// 库存断货预测 - 断货预测计算
// ==========================================
// 职责: 剩余周数 / 预计断货日期 / 库存状态
// 输入: Vec<JoinedRecord> + 锚点日期
// 输出: Vec<ForecastRow>（逐行纯计算, 无状态）
// ==========================================
// 口径:
// - 剩余周数 = 期末库存 / 平均周销量, 保留 N 位小数（银行家舍入）
//   仅当平均周销量 > 0 且期末库存存在时有值, 否则为空
// - 断货日期 = 锚点日 00:00 + 剩余周数 × 7 天（精确到微秒）, 取所在日历日
//   即小数天向更早的日期取整: 1.5 周 = 10.5 天 → +10 天
//   断货日期超出可表示范围时, 剩余周数一并置空（两者同有同无）
// - 状态: 期末库存存在且 <= 0 → 缺货; 其余（含库存未知）→ 有货
// ==========================================

use crate::domain::forecast::{DqViolation, ForecastRow, JoinedRecord};
use crate::domain::types::{DqLevel, StockStatus};
use chrono::{Duration, NaiveDate};
use tracing::{debug, instrument};

const MICROS_PER_WEEK: f64 = 7.0 * 86_400.0 * 1_000_000.0;

// ==========================================
// ForecastCalculator - 断货预测计算器
// ==========================================
pub struct ForecastCalculator {
    anchor_date: NaiveDate,
    weeks_remaining_decimals: u32,
}

impl ForecastCalculator {
    pub fn new(anchor_date: NaiveDate, weeks_remaining_decimals: u32) -> Self {
        Self {
            anchor_date,
            weeks_remaining_decimals,
        }
    }

    /// 剩余周数
    ///
    /// 期末库存为负不做特殊拦截, 按算术结果输出（剩余周数为负）
    pub fn weeks_remaining(
        &self,
        closing_inventory: Option<f64>,
        avg_weekly_sold: Option<f64>,
    ) -> Option<f64> {
        match (closing_inventory, avg_weekly_sold) {
            (Some(inventory), Some(avg)) if avg > 0.0 && inventory.is_finite() => Some(
                round_half_even(inventory / avg, self.weeks_remaining_decimals),
            ),
            _ => None,
        }
    }

    /// 预计断货日期
    ///
    /// 超出日期可表示范围时返回 None
    pub fn runout_date(&self, weeks_remaining: f64) -> Option<NaiveDate> {
        let micros = (weeks_remaining * MICROS_PER_WEEK).round();
        if !micros.is_finite() || micros.abs() >= i64::MAX as f64 {
            return None;
        }

        self.anchor_date
            .and_hms_opt(0, 0, 0)?
            .checked_add_signed(Duration::microseconds(micros as i64))
            .map(|dt| dt.date())
    }

    /// 单行预测
    pub fn forecast_row(&self, joined: &JoinedRecord) -> ForecastRow {
        self.project(joined).0
    }

    /// 单行预测, 同时返回因日期越界被置空的剩余周数
    fn project(&self, joined: &JoinedRecord) -> (ForecastRow, Option<f64>) {
        let avg_weekly_sold = joined.sales.avg_weekly_sold;
        let mut weeks_remaining = self.weeks_remaining(joined.closing_inventory, avg_weekly_sold);
        let estimated_runout_date = weeks_remaining.and_then(|w| self.runout_date(w));

        let mut overflowed = None;
        if estimated_runout_date.is_none() {
            overflowed = weeks_remaining.take();
        }

        let row = ForecastRow {
            product_name: joined.sales.product_name.clone(),
            closing_inventory: joined.closing_inventory,
            avg_weekly_sold,
            weeks_remaining,
            estimated_runout_date,
            status: StockStatus::classify(joined.closing_inventory),
        };
        (row, overflowed)
    }

    /// 批量预测（保持输入顺序）
    #[instrument(skip_all, fields(rows = joined.len(), anchor = %self.anchor_date))]
    pub fn calculate(&self, joined: &[JoinedRecord]) -> (Vec<ForecastRow>, Vec<DqViolation>) {
        let mut violations = Vec::new();

        let rows: Vec<ForecastRow> = joined
            .iter()
            .map(|record| {
                let (row, overflowed) = self.project(record);
                if let Some(weeks) = overflowed {
                    violations.push(DqViolation {
                        source: "sales".to_string(),
                        row_number: Some(record.sales.row_number),
                        product_name: Some(row.product_name.clone()),
                        level: DqLevel::Warning,
                        field: "Estimated Run-Out Date".to_string(),
                        message: format!(
                            "剩余周数 {} 超出日期可表示范围, 剩余周数与断货日期均留空",
                            weeks
                        ),
                    });
                }
                row
            })
            .collect();

        debug!(
            out_of_stock = rows.iter().filter(|r| r.status == StockStatus::OutOfStock).count(),
            "断货预测计算完成"
        );
        (rows, violations)
    }
}

/// 按十进制位数舍入, 半数取偶（以浮点数精确值为准）
///
/// 例: 2.25 → 2.2, 2.35 → 2.4（2.35 的二进制值略大于 2.35）
pub fn round_half_even(value: f64, decimals: u32) -> f64 {
    format!("{:.*}", decimals as usize, value)
        .parse::<f64>()
        .unwrap_or(value)
}
