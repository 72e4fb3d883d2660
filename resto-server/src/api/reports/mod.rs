//! Report API 模块
//!
//! 全部报表仅 admin/manager 可见。

mod handler;

use axum::{Router, middleware, routing::get};

use crate::auth::require_role;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/reports", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/daily-sales", get(handler::daily_sales))
        .route("/waiter-performance", get(handler::waiter_performance))
        .route("/monthly-revenue", get(handler::monthly_revenue))
        .route("/inventory", get(handler::inventory))
        .layer(middleware::from_fn(require_role(&["admin", "manager"])))
}
