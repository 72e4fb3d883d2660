//! Resto Server - 餐厅点单/桌台管理系统后端
//!
//! # 模块结构
//!
//! ```text
//! resto-server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── auth/          # JWT 认证 + 角色检查中间件
//! ├── api/           # HTTP 路由和处理器
//! ├── db/            # 数据库层 (模型 + 仓储)
//! └── utils/         # 小票渲染等工具
//! ```
//!
//! 资源：菜品 (menu_item)、桌台 (table)、订单 (order)、用户 (user)。
//! 订单创建会占用桌台，完成/支付会把桌台转入清洁状态，取消则释放桌台。

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod utils;

// Re-export 公共类型
pub use crate::core::{Config, Server, ServerState};
pub use shared::{AppError, AppResult, CurrentUser, JwtService};
