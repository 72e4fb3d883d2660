//! 认证/授权中间件

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::core::ServerState;
use shared::jwt::JwtError;
use shared::{AppError, CurrentUser, JwtService, security_log};

/// 无需令牌的 API 路径
const PUBLIC_ROUTES: &[&str] = &["/api/users/login", "/api/users/register", "/api/health"];

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
/// 注入请求扩展供 handler 和 [`require_role`] 读取。
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

/// 角色检查中间件 - 要求任一指定角色
///
/// 管理员 (`role == "admin"`) 隐式通过所有检查。
///
/// # 用法
///
/// ```ignore
/// use axum::middleware;
/// Router::new()
///     .route("/api/reports/daily-sales", get(handler::daily_sales))
///     .layer(middleware::from_fn(require_role(&["admin", "manager"])));
/// ```
///
/// # 错误
///
/// 角色不符返回 403 Forbidden
pub fn require_role(
    roles: &'static [&'static str],
) -> impl Fn(
    Request,
    Next,
) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<Response, AppError>> + Send>>
+ Clone {
    move |req: Request, next: Next| {
        Box::pin(async move {
            let user = req
                .extensions()
                .get::<CurrentUser>()
                .ok_or(AppError::unauthorized())?;

            if !user.has_role(roles) {
                security_log!(
                    "WARN",
                    "role_denied",
                    user_id = user.id.clone(),
                    username = user.username.clone(),
                    user_role = user.role.clone(),
                    required_roles = roles.join(",")
                );
                return Err(AppError::forbidden(format!(
                    "Requires one of roles: {}",
                    roles.join(", ")
                )));
            }

            Ok(next.run(req).await)
        })
    }
}
