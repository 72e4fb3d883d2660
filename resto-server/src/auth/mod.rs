//! 认证模块
//!
//! JWT 服务来自 `shared::jwt`，本模块提供认证和角色检查中间件。

pub mod middleware;

pub use middleware::{require_auth, require_role};
pub use shared::{Claims, CurrentUser, JwtService};
