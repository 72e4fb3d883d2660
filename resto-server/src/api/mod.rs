//! API Module
//!
//! 路由按资源分组，每个资源一个子模块：mod.rs 声明路由和角色门禁，
//! handler.rs 写处理逻辑。

pub mod health;
pub mod menu;
pub mod orders;
pub mod reports;
pub mod tables;
pub mod users;
