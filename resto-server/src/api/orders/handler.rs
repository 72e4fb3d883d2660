//! Order API Handlers

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use validator::Validate;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Order, OrderCreate, PaymentRequest, StatusUpdate};
use crate::db::repository::OrderRepository;
use crate::utils::{AppError, AppResult, generate_receipt};

/// POST /api/orders - 下单 (服务员身份取自 token)
pub async fn place(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<OrderCreate>,
) -> AppResult<Json<Order>> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let repo = OrderRepository::new(state.get_db());
    let order = repo.place(&current_user.id, payload).await?;

    tracing::info!(
        order_number = %order.order_number,
        table = order.table,
        total = order.total,
        "Order placed"
    );
    Ok(Json(order))
}

/// GET /api/orders - 订单列表 (新的在前)
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Order>>> {
    let repo = OrderRepository::new(state.get_db());
    let orders = repo.find_all().await?;
    Ok(Json(orders))
}

/// GET /api/orders/:id - 获取单个订单
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

/// GET /api/orders/table/:table_number - 桌台订单历史
pub async fn list_by_table(
    State(state): State<ServerState>,
    Path(table_number): Path<i64>,
) -> AppResult<Json<Vec<Order>>> {
    let repo = OrderRepository::new(state.get_db());
    let orders = repo.find_by_table(table_number).await?;
    Ok(Json(orders))
}

/// GET /api/orders/waiter/:waiter_id - 服务员订单历史
pub async fn list_by_waiter(
    State(state): State<ServerState>,
    Path(waiter_id): Path<String>,
) -> AppResult<Json<Vec<Order>>> {
    let repo = OrderRepository::new(state.get_db());
    let orders = repo.find_by_waiter(&waiter_id).await?;
    Ok(Json(orders))
}

/// PATCH /api/orders/:id/status - 状态流转
pub async fn update_status(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<StatusUpdate>,
) -> AppResult<Json<Order>> {
    let repo = OrderRepository::new(state.get_db());
    let order = repo.update_status(&id, payload.status).await?;

    tracing::info!(order_number = %order.order_number, status = ?order.status, "Order status changed");
    Ok(Json(order))
}

/// PATCH /api/orders/:id/payment - 支付并完成订单
pub async fn process_payment(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<PaymentRequest>,
) -> AppResult<Json<Order>> {
    let repo = OrderRepository::new(state.get_db());
    let order = repo.process_payment(&id, payload.payment_method).await?;

    tracing::info!(
        order_number = %order.order_number,
        method = payload.payment_method.as_str(),
        total = order.total,
        "Payment processed"
    );
    Ok(Json(order))
}

/// GET /api/orders/:id/receipt - 文本小票
pub async fn receipt(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<String> {
    let repo = OrderRepository::new(state.get_db());
    let order = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {} not found", id)))?;
    Ok(generate_receipt(&order))
}
