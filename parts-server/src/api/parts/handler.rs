//! Part API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use validator::Validate;

use crate::core::ServerState;
use crate::db::models::{Part, PartCreate, PartFull, PartUpdate};
use crate::db::repository::PartRepository;
use crate::utils::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub query: String,
}

/// GET /api/parts - 获取所有配件 (分类已解析)
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<PartFull>>> {
    let repo = PartRepository::new(state.get_db());
    let parts = repo.find_all_full().await?;
    Ok(Json(parts))
}

/// GET /api/parts/search?query= - 按名称/描述/编号搜索
pub async fn search(
    State(state): State<ServerState>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<Vec<PartFull>>> {
    if params.query.trim().is_empty() {
        return Err(AppError::validation("query parameter is required"));
    }
    let repo = PartRepository::new(state.get_db());
    let parts = repo.search(params.query.trim()).await?;
    Ok(Json(parts))
}

/// GET /api/parts/low-stock - 库存不高于阈值的配件
pub async fn low_stock(State(state): State<ServerState>) -> AppResult<Json<Vec<PartFull>>> {
    let repo = PartRepository::new(state.get_db());
    let parts = repo.find_low_stock().await?;
    Ok(Json(parts))
}

/// GET /api/parts/:id - 获取单个配件
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<PartFull>> {
    let repo = PartRepository::new(state.get_db());
    let part = repo
        .find_by_id_full(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Part {} not found", id)))?;
    Ok(Json(part))
}

/// POST /api/parts - 创建配件
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<PartCreate>,
) -> AppResult<Json<Part>> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let repo = PartRepository::new(state.get_db());
    let part = repo.create(payload).await?;

    tracing::info!(part_number = %part.part_number, "Part created");
    Ok(Json(part))
}

/// PUT /api/parts/:id - 更新配件
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<PartUpdate>,
) -> AppResult<Json<Part>> {
    let repo = PartRepository::new(state.get_db());
    let part = repo.update(&id, payload).await?;
    Ok(Json(part))
}

/// DELETE /api/parts/:id - 删除配件
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let repo = PartRepository::new(state.get_db());
    let result = repo.delete(&id).await?;
    Ok(Json(result))
}
