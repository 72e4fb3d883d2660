//! 工具模块
//!
//! 错误类型和响应结构统一来自 `shared::error`。

pub mod receipt;

pub use receipt::generate_receipt;
pub use shared::error::{AppError, AppResponse, AppResult, ok, ok_with_message};
