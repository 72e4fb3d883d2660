//! 认证中间件

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::core::ServerState;
use shared::jwt::JwtError;
use shared::{AppError, CurrentUser, JwtService, security_log};

/// 无需令牌的 API 路径
const PUBLIC_ROUTES: &[&str] = &["/api/auth/login", "/api/auth/register", "/api/health"];

/// 请求是否跳过认证
///
/// - CORS 预检 (OPTIONS)
/// - 非 `/api/` 路径 (交给路由正常 404)
/// - [`PUBLIC_ROUTES`] 中的公开接口
fn skips_auth(req: &Request) -> bool {
    if req.method() == http::Method::OPTIONS {
        return true;
    }
    let path = req.uri().path();
    !path.starts_with("/api/") || PUBLIC_ROUTES.contains(&path)
}

/// 认证中间件
///
/// 从 `Authorization: Bearer <token>` 头验证 JWT，成功后把 [`CurrentUser`]
/// 注入请求扩展供 handler 读取。
///
/// | 失败场景 | 响应 |
/// |----------|------|
/// | 无 Authorization 头 | 401 E1001 |
/// | 令牌无效 | 401 E1002 |
/// | 令牌过期 | 401 E1003 |
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    if skips_auth(&req) {
        return Ok(next.run(req).await);
    }

    let header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());
    let Some(header) = header else {
        security_log!("WARN", "auth_missing", uri = format!("{:?}", req.uri()));
        return Err(AppError::unauthorized());
    };
    let token = JwtService::extract_from_header(header)
        .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))?;

    let claims = state.get_jwt_service().validate_token(token).map_err(|e| {
        security_log!(
            "WARN",
            "auth_failed",
            error = format!("{}", e),
            uri = format!("{:?}", req.uri())
        );
        match e {
            JwtError::ExpiredToken => AppError::token_expired(),
            _ => AppError::invalid_token("Invalid token"),
        }
    })?;

    req.extensions_mut().insert(CurrentUser::from(claims));
    Ok(next.run(req).await)
}
