//! Parts Server - 汽车配件库存/订单系统后端
//!
//! # 模块结构
//!
//! ```text
//! parts-server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── auth/          # JWT 认证中间件
//! ├── api/           # HTTP 路由和处理器
//! └── db/            # 数据库层 (模型 + 仓储)
//! ```
//!
//! 资源：分类 (category)、配件 (part)、订单 (order)、用户 (user)。
//! 订单创建会校验库存、快照单价并在创建成功后扣减库存。

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod utils;

// Re-export 公共类型
pub use crate::core::{Config, Server, ServerState};
pub use shared::{AppError, AppResult, CurrentUser, JwtService};
