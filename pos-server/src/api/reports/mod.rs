//! Report API 模块 (销售汇总 / 对账)
//!
//! 所有日期边界按 `TIMEZONE` 业务时区计算。

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/reports", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/daily", get(handler::daily))
        .route("/weekly", get(handler::weekly))
        .route("/monthly", get(handler::monthly))
        .route("/daily-buckets", get(handler::daily_buckets))
        .route("/cashier-daily", get(handler::cashier_daily))
        .route("/sold-items", get(handler::sold_items))
        .route("/reconciliation", get(handler::reconciliation))
}
