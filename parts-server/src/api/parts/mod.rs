//! Part API 模块
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/parts | GET/POST | 列表 / 创建 |
//! | /api/parts/search?query= | GET | 子串搜索 |
//! | /api/parts/low-stock | GET | 低库存列表 |
//! | /api/parts/{id} | GET/PUT/DELETE | 单个配件 |

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/parts", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/search", get(handler::search))
        .route("/low-stock", get(handler::low_stock))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
}
