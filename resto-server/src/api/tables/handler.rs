//! Table API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use validator::Validate;

use crate::core::ServerState;
use crate::db::models::{Table, TableCreate, TableFull, TableStatusUpdate, WaiterAssignment};
use crate::db::repository::TableRepository;
use crate::utils::{AppError, AppResult};

/// GET /api/tables - 所有桌台 (服务员已解析)
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<TableFull>>> {
    let repo = TableRepository::new(state.get_db());
    let tables = repo.find_all_full().await?;
    Ok(Json(tables))
}

/// GET /api/tables/available - 可用桌台
pub async fn available(State(state): State<ServerState>) -> AppResult<Json<Vec<Table>>> {
    let repo = TableRepository::new(state.get_db());
    let tables = repo.find_available().await?;
    Ok(Json(tables))
}

/// GET /api/tables/:id - 获取单个桌台
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Table>> {
    let repo = TableRepository::new(state.get_db());
    let table = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Table {} not found", id)))?;
    Ok(Json(table))
}

/// POST /api/tables - 新建桌台 (admin)
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<TableCreate>,
) -> AppResult<Json<Table>> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let repo = TableRepository::new(state.get_db());
    let table = repo.create(payload).await?;

    tracing::info!(table_number = table.table_number, "Table created");
    Ok(Json(table))
}

/// PATCH /api/tables/:id/status - 手动状态流转
pub async fn set_status(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<TableStatusUpdate>,
) -> AppResult<Json<Table>> {
    let repo = TableRepository::new(state.get_db());
    let table = repo.set_status(&id, payload.status).await?;

    tracing::info!(table_number = table.table_number, status = ?table.status, "Table status changed");
    Ok(Json(table))
}

/// PATCH /api/tables/:id/assign-waiter - 分配/取消分配服务员
pub async fn assign_waiter(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<WaiterAssignment>,
) -> AppResult<Json<Table>> {
    let repo = TableRepository::new(state.get_db());
    let table = repo.assign_waiter(&id, payload.waiter).await?;
    Ok(Json(table))
}

/// DELETE /api/tables/:id - 删除桌台 (admin)
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let repo = TableRepository::new(state.get_db());
    let result = repo.delete(&id).await?;
    Ok(Json(result))
}
