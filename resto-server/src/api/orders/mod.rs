//! Order API 模块
//!
//! | 路径 | 方法 | 说明 | 角色 |
//! |------|------|------|------|
//! | /api/orders | POST | 下单 (占用桌台) | admin/waiter |
//! | /api/orders | GET | 订单列表 | 登录用户 |
//! | /api/orders/{id} | GET | 单个订单 | 登录用户 |
//! | /api/orders/table/{n} | GET | 桌台订单历史 | 登录用户 |
//! | /api/orders/waiter/{id} | GET | 服务员订单历史 | 登录用户 |
//! | /api/orders/{id}/status | PATCH | 状态流转 | admin/waiter |
//! | /api/orders/{id}/payment | PATCH | 支付 | admin/waiter |
//! | /api/orders/{id}/receipt | GET | 文本小票 | 登录用户 |

mod handler;

use axum::{Router, middleware, routing::get, routing::patch, routing::post};

use crate::auth::require_role;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    let read_routes = Router::new()
        .route("/", get(handler::list))
        .route("/{id}", get(handler::get_by_id))
        .route("/table/{table_number}", get(handler::list_by_table))
        .route("/waiter/{waiter_id}", get(handler::list_by_waiter))
        .route("/{id}/receipt", get(handler::receipt));

    let waiter_routes = Router::new()
        .route("/", post(handler::place))
        .route("/{id}/status", patch(handler::update_status))
        .route("/{id}/payment", patch(handler::process_payment))
        .layer(middleware::from_fn(require_role(&["admin", "waiter"])));

    read_routes.merge(waiter_routes)
}
