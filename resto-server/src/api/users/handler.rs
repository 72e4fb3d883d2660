//! User API Handlers

use std::time::Duration;

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use serde::Serialize;
use validator::Validate;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{LoginRequest, RegisterRequest, UserPublic, UserUpdate};
use crate::db::repository::UserRepository;
use crate::utils::{AppError, AppResult};

/// Fixed delay for authentication to prevent timing attacks
const AUTH_FIXED_DELAY_MS: u64 = 500;

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserPublic,
}

/// POST /api/users/register - 注册
pub async fn register(
    State(state): State<ServerState>,
    Json(payload): Json<RegisterRequest>,
) -> AppResult<Json<UserPublic>> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let repo = UserRepository::new(state.get_db());
    let user = repo.register(payload).await?;

    tracing::info!(email = %user.email, role = %user.role, "User registered");
    Ok(Json(user.to_public()))
}

/// POST /api/users/login - 邮箱登录
///
/// 统一错误消息，避免暴露邮箱是否存在。成功时刷新 last_login。
pub async fn login(
    State(state): State<ServerState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let repo = UserRepository::new(state.get_db());
    let user = repo.authenticate(&payload.email, &payload.password).await?;

    // Fixed delay to prevent timing attacks (before checking result)
    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    let user = match user {
        Some(u) => u,
        None => {
            tracing::warn!(email = %payload.email, "Login failed");
            return Err(AppError::invalid("Invalid email or password"));
        }
    };

    let user_id = user.id.as_ref().map(|t| t.to_string()).unwrap_or_default();
    let token = state
        .get_jwt_service()
        .generate_token(&user_id, &user.email, &user.role)
        .map_err(|e| AppError::internal(format!("Failed to generate token: {}", e)))?;

    tracing::info!(user_id = %user_id, email = %user.email, "User logged in");

    Ok(Json(LoginResponse {
        token,
        user: user.to_public(),
    }))
}

/// GET /api/users/me - 当前用户信息
pub async fn me(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<UserPublic>> {
    let repo = UserRepository::new(state.get_db());
    let user = repo
        .find_by_id(&current_user.id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("User {} not found", current_user.id)))?;
    Ok(Json(user.to_public()))
}

/// GET /api/users - 所有用户
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<UserPublic>>> {
    let repo = UserRepository::new(state.get_db());
    let users = repo.find_all().await?;
    Ok(Json(users.iter().map(|u| u.to_public()).collect()))
}

/// GET /api/users/available-waiters - 未被桌台占用的在职服务员
pub async fn available_waiters(
    State(state): State<ServerState>,
) -> AppResult<Json<Vec<UserPublic>>> {
    let repo = UserRepository::new(state.get_db());
    let waiters = repo.find_available_waiters().await?;
    Ok(Json(waiters.iter().map(|u| u.to_public()).collect()))
}

/// GET /api/users/:id - 获取单个用户
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<UserPublic>> {
    let repo = UserRepository::new(state.get_db());
    let user = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("User {} not found", id)))?;
    Ok(Json(user.to_public()))
}

/// PATCH /api/users/:id - 更新用户
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<UserUpdate>,
) -> AppResult<Json<UserPublic>> {
    let repo = UserRepository::new(state.get_db());
    let user = repo.update(&id, payload).await?;
    Ok(Json(user.to_public()))
}

/// DELETE /api/users/:id - 删除用户
pub async fn delete(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    if current_user.id == id {
        return Err(AppError::business_rule("Cannot delete your own account"));
    }
    let repo = UserRepository::new(state.get_db());
    let result = repo.delete(&id).await?;
    Ok(Json(result))
}
