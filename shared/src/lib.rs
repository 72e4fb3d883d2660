//! Shared infrastructure for the storefront servers
//!
//! 两个后端 (parts-server / resto-server) 共用的基础设施：
//!
//! - **错误处理** (`error`): [`AppError`] 错误枚举和统一响应结构
//! - **认证** (`jwt`): JWT 令牌服务和当前用户上下文
//! - **日志** (`logger`): tracing 初始化
//! - **序列化** (`serde_helpers`): RecordId 的 "table:id" 字符串编解码
//! - **工具** (`util`): 日期/时间辅助函数

pub mod error;
pub mod jwt;
pub mod logger;
pub mod serde_helpers;
pub mod util;

// Re-export 公共类型
pub use error::{AppError, AppResponse, AppResult, ok, ok_with_message};
pub use jwt::{Claims, CurrentUser, JwtConfig, JwtService};
pub use logger::{init_logger, init_logger_with_file};

// Security logging macro - 支持 tracing 格式说明符
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}
