//! API Module
//!
//! 路由按资源分组，每个资源一个子模块：mod.rs 声明路由，handler.rs 写处理逻辑。

pub mod auth;
pub mod categories;
pub mod health;
pub mod orders;
pub mod parts;
