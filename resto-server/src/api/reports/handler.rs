//! Report API Handlers
//!
//! 日期参数统一为 YYYY-MM-DD，范围为 [start 当天 00:00, end 当天 23:59:59.999]。

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::repository::ReportRepository;
use crate::db::repository::report::{
    DailySalesReport, InventoryEntry, MonthlyRevenue, WaiterPerformance,
};
use crate::utils::{AppError, AppResult};
use shared::util::{day_end_millis, day_start_millis};

#[derive(Debug, Deserialize)]
pub struct RangeParams {
    pub start_date: String,
    pub end_date: String,
}

#[derive(Debug, Deserialize)]
pub struct YearParams {
    pub year: i32,
}

fn parse_range(params: &RangeParams) -> Result<(i64, i64), AppError> {
    let start = day_start_millis(&params.start_date)
        .ok_or_else(|| AppError::validation("start_date must be YYYY-MM-DD"))?;
    let end = day_end_millis(&params.end_date)
        .ok_or_else(|| AppError::validation("end_date must be YYYY-MM-DD"))?;
    if start > end {
        return Err(AppError::validation("start_date must not be after end_date"));
    }
    Ok((start, end))
}

/// GET /api/reports/daily-sales - 今日已完成订单汇总
pub async fn daily_sales(State(state): State<ServerState>) -> AppResult<Json<DailySalesReport>> {
    let repo = ReportRepository::new(state.get_db());
    let report = repo.daily_sales().await?;
    Ok(Json(report))
}

/// GET /api/reports/waiter-performance?start_date&end_date - 服务员业绩
pub async fn waiter_performance(
    State(state): State<ServerState>,
    Query(params): Query<RangeParams>,
) -> AppResult<Json<Vec<WaiterPerformance>>> {
    let (start, end) = parse_range(&params)?;
    let repo = ReportRepository::new(state.get_db());
    let report = repo.waiter_performance(start, end).await?;
    Ok(Json(report))
}

/// GET /api/reports/monthly-revenue?year - 某年 12 个月营收
pub async fn monthly_revenue(
    State(state): State<ServerState>,
    Query(params): Query<YearParams>,
) -> AppResult<Json<Vec<MonthlyRevenue>>> {
    let repo = ReportRepository::new(state.get_db());
    let report = repo.monthly_revenue(params.year).await?;
    Ok(Json(report))
}

/// GET /api/reports/inventory?start_date&end_date - 菜品销量与营收
pub async fn inventory(
    State(state): State<ServerState>,
    Query(params): Query<RangeParams>,
) -> AppResult<Json<Vec<InventoryEntry>>> {
    let (start, end) = parse_range(&params)?;
    let repo = ReportRepository::new(state.get_db());
    let report = repo.inventory(start, end).await?;
    Ok(Json(report))
}
