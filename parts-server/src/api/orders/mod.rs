//! Order API 模块
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/orders | GET/POST | 列表 / 下单 |
//! | /api/orders/report | GET | 销售报表 |
//! | /api/orders/{id} | GET/PUT | 详情 / 状态更新 |

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/report", get(handler::report))
        .route("/{id}", get(handler::get_by_id).put(handler::update))
}
