//! Shift API 模块 (班次管理)

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/shifts", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::open))
        .route("/current", get(handler::get_current))
        .route("/close-current", post(handler::close_current))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/close", post(handler::close))
        .route("/{id}/reconciliation", get(handler::reconciliation))
}
