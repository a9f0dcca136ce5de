//! Shift API Handlers

use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::Deserialize;
use shared::models::{Shift, ShiftClose, ShiftCloseCurrent, ShiftOpen, ShiftReconciliation};

use crate::api::{MAX_LIMIT, body_rejection, default_limit};
use crate::core::ServerState;
use crate::utils::time;
use crate::utils::{AppError, AppResult};

/// Query params for listing shifts
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default)]
    pub offset: usize,
    /// Shifts started on this business day; paging is ignored
    pub date: Option<String>,
}

/// GET /api/shifts - 获取班次列表
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Shift>>> {
    let shifts = match query.date.as_deref() {
        Some(date) => state.shifts.shifts_by_date(time::parse_date(date)?).await?,
        None => {
            state
                .shifts
                .list_shifts(query.limit.min(MAX_LIMIT), query.offset)
                .await?
        }
    };
    Ok(Json(shifts))
}

/// GET /api/shifts/:id - 获取单个班次
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Shift>> {
    Ok(Json(state.shifts.get_shift(id).await?))
}

#[derive(Debug, Deserialize)]
pub struct CurrentQuery {
    pub cashier: Option<String>,
}

/// GET /api/shifts/current - 收银员当前班次 (没有则为 null)
pub async fn get_current(
    State(state): State<ServerState>,
    Query(query): Query<CurrentQuery>,
) -> AppResult<Json<Option<Shift>>> {
    let cashier = query
        .cashier
        .filter(|c| !c.trim().is_empty())
        .ok_or_else(|| AppError::required("cashier", "cashier is required"))?;
    Ok(Json(state.shifts.current_shift(&cashier).await?))
}

/// POST /api/shifts - 开班
pub async fn open(
    State(state): State<ServerState>,
    payload: Result<Json<ShiftOpen>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Shift>)> {
    let Json(payload) = payload.map_err(body_rejection)?;
    let shift = state
        .shifts
        .open_shift(payload, shared::util::now_millis())
        .await?;
    Ok((StatusCode::CREATED, Json(shift)))
}

/// POST /api/shifts/:id/close - 交班
pub async fn close(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    payload: Result<Json<ShiftClose>, JsonRejection>,
) -> AppResult<Json<Shift>> {
    let Json(payload) = payload.map_err(body_rejection)?;
    let shift = state
        .shifts
        .close_shift(id, payload, shared::util::now_millis())
        .await?;
    Ok(Json(shift))
}

/// POST /api/shifts/close-current - 按收银员交班
pub async fn close_current(
    State(state): State<ServerState>,
    payload: Result<Json<ShiftCloseCurrent>, JsonRejection>,
) -> AppResult<Json<Shift>> {
    let Json(payload) = payload.map_err(body_rejection)?;
    let close = ShiftClose {
        ending_cash: payload.ending_cash,
        note: payload.note,
    };
    let shift = state
        .shifts
        .close_current_shift(&payload.cashier_name, close, shared::util::now_millis())
        .await?;
    Ok(Json(shift))
}

/// GET /api/shifts/:id/reconciliation - 班次对账
pub async fn reconciliation(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ShiftReconciliation>> {
    Ok(Json(state.shifts.reconcile(id).await?))
}
