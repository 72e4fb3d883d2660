//! Order API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use validator::Validate;

use crate::core::ServerState;
use crate::db::models::{Order, OrderCreate, OrderUpdate, SalesReport};
use crate::db::repository::OrderRepository;
use crate::utils::{AppError, AppResult};
use shared::util::{day_end_millis, day_start_millis};

/// GET /api/orders - 所有订单，最新在前
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Order>>> {
    let repo = OrderRepository::new(state.get_db());
    let orders = repo.find_all().await?;
    Ok(Json(orders))
}

/// GET /api/orders/:id - 订单详情
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    let repo = OrderRepository::new(state.get_db());
    let order = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {} not found", id)))?;
    Ok(Json(order))
}

/// POST /api/orders - 下单
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<OrderCreate>,
) -> AppResult<Json<Order>> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let repo = OrderRepository::new(state.get_db());
    let order = repo.place(payload).await?;

    tracing::info!(
        order_number = %order.order_number,
        total = order.total_amount,
        "Order placed"
    );
    Ok(Json(order))
}

/// PUT /api/orders/:id - 更新状态/支付方式
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<OrderUpdate>,
) -> AppResult<Json<Order>> {
    let repo = OrderRepository::new(state.get_db());
    let order = repo.update(&id, payload).await?;

    tracing::info!(order_number = %order.order_number, status = ?order.status, "Order updated");
    Ok(Json(order))
}

#[derive(Debug, Deserialize)]
pub struct ReportParams {
    pub start_date: String,
    pub end_date: String,
}

/// GET /api/orders/report?start_date&end_date - 范围内已完成订单的销售报表
pub async fn report(
    State(state): State<ServerState>,
    Query(params): Query<ReportParams>,
) -> AppResult<Json<SalesReport>> {
    let start = day_start_millis(&params.start_date)
        .ok_or_else(|| AppError::validation("start_date must be YYYY-MM-DD"))?;
    let end = day_end_millis(&params.end_date)
        .ok_or_else(|| AppError::validation("end_date must be YYYY-MM-DD"))?;
    if start > end {
        return Err(AppError::validation("start_date must not be after end_date"));
    }

    let repo = OrderRepository::new(state.get_db());
    let report = repo.sales_report(start, end).await?;
    Ok(Json(report))
}
