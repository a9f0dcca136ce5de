//! 销售汇总
//!
//! - [`money`] - Decimal 金额计算
//! - [`aggregate`] - 纯函数汇总 (日/周/月/按日分桶/收银员/售出商品)
//! - [`SalesService`] - 开票、作废、报表

pub mod aggregate;
pub mod money;
mod service;

pub use service::SalesService;
