//! POS Server - 零售收银后端
//!
//! # 架构概述
//!
//! - **开票与作废** (`sales`): 开票、折扣计算、软删除作废
//! - **销售汇总** (`sales::aggregate`): 日 / 周 / 月汇总、按天分组、按收银员汇总
//! - **班次对账** (`shifts`): 开班、交班、现金差额
//! - **存储** (`db`): 嵌入式 SurrealDB 或内存存储
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! pos-server/src/
//! ├── core/          # 配置、状态、错误、服务器
//! ├── api/           # HTTP 路由和处理器
//! ├── db/            # 存储 trait 与实现
//! ├── sales/         # 账单与销售汇总
//! ├── shifts/        # 班次与对账
//! └── utils/         # 日志、时间、校验
//! ```

pub mod api;
pub mod core;
pub mod db;
pub mod sales;
pub mod shifts;
pub mod utils;

// Re-export 公共类型
pub use crate::core::{Config, Server, ServerState, build_app};
pub use utils::{AppError, AppResult};

// Re-export unified error types from shared
pub use utils::{ApiResponse, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{cleanup_old_logs, init_logger, init_logger_with_file};

/// dotenv, work directory and logging
///
/// Returns the loaded config; fallback warnings are logged once the
/// logger is up.
pub fn setup_environment() -> anyhow::Result<Config> {
    dotenv::dotenv().ok();

    let (config, warnings) = Config::from_env_with_warnings();
    std::fs::create_dir_all(&config.work_dir)?;

    let log_dir = config.log_dir();
    init_logger_with_file(&config.log_level, config.log_json, log_dir.to_str())?;

    for warning in warnings {
        tracing::warn!("{}", warning);
    }
    Ok(config)
}

pub fn print_banner() {
    println!(
        r#"
    ____  ____  _____
   / __ \/ __ \/ ___/
  / /_/ / / / /\__ \
 / ____/ /_/ /___/ /
/_/    \____//____/
    "#
    );
}
