//! User API 模块
//!
//! | 路径 | 方法 | 说明 | 角色 |
//! |------|------|------|------|
//! | /api/users/register | POST | 注册 | 公开 |
//! | /api/users/login | POST | 登录 (邮箱) | 公开 |
//! | /api/users/me | GET | 当前用户 | 任意登录用户 |
//! | /api/users | GET | 用户列表 | admin/manager |
//! | /api/users/available-waiters | GET | 空闲服务员 | admin/manager |
//! | /api/users/{id} | GET/PATCH/DELETE | 用户管理 | admin |

mod handler;

use axum::{Router, middleware, routing::get, routing::post};

use crate::auth::require_role;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/users", routes())
}

fn routes() -> Router<ServerState> {
    let public_routes = Router::new()
        .route("/register", post(handler::register))
        .route("/login", post(handler::login))
        .route("/me", get(handler::me));

    let manager_routes = Router::new()
        .route("/", get(handler::list))
        .route("/available-waiters", get(handler::available_waiters))
        .layer(middleware::from_fn(require_role(&["admin", "manager"])));

    let admin_routes = Router::new()
        .route(
            "/{id}",
            get(handler::get_by_id)
                .patch(handler::update)
                .delete(handler::delete),
        )
        .layer(middleware::from_fn(require_role(&["admin"])));

    public_routes.merge(manager_routes).merge(admin_routes)
}
