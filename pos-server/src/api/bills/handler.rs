//! Bill API Handlers

use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::Deserialize;
use shared::models::{Bill, BillCreate, BillVoid};

use crate::api::{MAX_LIMIT, body_rejection, default_limit};
use crate::core::ServerState;
use crate::db::TimeRange;
use crate::utils::time;
use crate::utils::{AppError, AppResult};

/// Query params for listing bills
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default)]
    pub offset: usize,
    /// Millis, RFC 3339 or YYYY-MM-DD
    pub start: Option<String>,
    pub end: Option<String>,
}

/// GET /api/bills - 账单列表 (新到旧)
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Bill>>> {
    let tz = state.sales.timezone();
    let range = match (query.start.as_deref(), query.end.as_deref()) {
        (Some(start), Some(end)) => {
            let start = time::parse_instant(start, tz)?;
            let end = time::parse_instant(end, tz)?;
            if end < start {
                return Err(AppError::validation("End must not be before start"));
            }
            Some(TimeRange::half_open(start, end))
        }
        (None, None) => None,
        _ => {
            return Err(AppError::validation(
                "start and end must be given together",
            ));
        }
    };

    let bills = state
        .sales
        .list_bills(range, query.limit.min(MAX_LIMIT), query.offset)
        .await?;
    Ok(Json(bills))
}

/// GET /api/bills/:invoice - 按发票号查询
pub async fn get_by_invoice(
    State(state): State<ServerState>,
    Path(invoice): Path<String>,
) -> AppResult<Json<Bill>> {
    let bill = state.sales.get_bill(&invoice).await?;
    Ok(Json(bill))
}

/// POST /api/bills - 开票
pub async fn create(
    State(state): State<ServerState>,
    payload: Result<Json<BillCreate>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Bill>)> {
    let Json(payload) = payload.map_err(body_rejection)?;
    let bill = state
        .sales
        .create_bill(payload, shared::util::now_millis())
        .await?;
    Ok((StatusCode::CREATED, Json(bill)))
}

/// POST /api/bills/void - 作废账单
pub async fn void(
    State(state): State<ServerState>,
    payload: Result<Json<BillVoid>, JsonRejection>,
) -> AppResult<Json<Bill>> {
    let Json(payload) = payload.map_err(body_rejection)?;
    let invoice = payload.invoice_number.unwrap_or_default();
    let bill = state
        .sales
        .void_bill(&invoice, shared::util::now_millis())
        .await?;
    Ok(Json(bill))
}
