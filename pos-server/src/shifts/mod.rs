//! 班次与对账
//!
//! - [`reconcile`] - 钱箱对账计算
//! - [`ShiftService`] - 开班、交班、对账

pub mod reconcile;
mod service;

pub use service::ShiftService;
