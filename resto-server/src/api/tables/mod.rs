//! Table API 模块
//!
//! | 路径 | 方法 | 说明 | 角色 |
//! |------|------|------|------|
//! | /api/tables | GET | 桌台列表 (服务员已解析) | 登录用户 |
//! | /api/tables/available | GET | 可用桌台 | 登录用户 |
//! | /api/tables/{id} | GET | 单个桌台 | 登录用户 |
//! | /api/tables | POST | 新建桌台 | admin |
//! | /api/tables/{id} | DELETE | 删除桌台 | admin |
//! | /api/tables/{id}/status | PATCH | 状态流转 | admin/manager |
//! | /api/tables/{id}/assign-waiter | PATCH | 分配服务员 | admin/manager |

mod handler;

use axum::{Router, middleware, routing::get, routing::patch};

use crate::auth::require_role;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/tables", routes())
}

fn routes() -> Router<ServerState> {
    let read_routes = Router::new()
        .route("/", get(handler::list))
        .route("/available", get(handler::available))
        .route("/{id}", get(handler::get_by_id));

    let manager_routes = Router::new()
        .route("/{id}/status", patch(handler::set_status))
        .route("/{id}/assign-waiter", patch(handler::assign_waiter))
        .layer(middleware::from_fn(require_role(&["admin", "manager"])));

    let admin_routes = Router::new()
        .route("/", axum::routing::post(handler::create))
        .route("/{id}", axum::routing::delete(handler::delete))
        .layer(middleware::from_fn(require_role(&["admin"])));

    read_routes.merge(manager_routes).merge(admin_routes)
}
