//! 认证模块
//!
//! JWT 服务来自 `shared::jwt`，本模块只提供 Axum 中间件。

pub mod middleware;

pub use middleware::require_auth;
pub use shared::{Claims, CurrentUser, JwtService};
