use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use chrono_tz::Tz;

/// Store backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    /// Embedded SurrealDB (RocksDB) under `<work_dir>/database/pos.db`
    Surreal,
    /// In-process, nothing persisted
    Memory,
}

impl StoreKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Surreal => "surreal",
            Self::Memory => "memory",
        }
    }
}

impl FromStr for StoreKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "surreal" | "surrealdb" | "rocksdb" => Ok(Self::Surreal),
            "memory" | "mem" => Ok(Self::Memory),
            other => Err(format!("unknown store backend '{other}'")),
        }
    }
}

/// 服务器配置
///
/// # 环境变量
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | ./work_dir | 工作目录 (数据库、日志) |
/// | HTTP_PORT | 5000 | HTTP 服务端口 |
/// | ENVIRONMENT | development | 运行环境 |
/// | TIMEZONE | Asia/Manila | 业务时区 (IANA) |
/// | STORE_BACKEND | surreal | surreal / memory |
/// | STORE_TIMEOUT_MS | 5000 | 单次存储调用超时(毫秒) |
/// | REQUEST_TIMEOUT_MS | 30000 | 请求超时(毫秒) |
/// | SHUTDOWN_TIMEOUT_MS | 10000 | 优雅关闭等待(毫秒) |
/// | LOG_LEVEL | info | 日志级别 (RUST_LOG 优先) |
/// | LOG_JSON | production 为 true | JSON 日志 |
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/data/pos HTTP_PORT=8080 STORE_BACKEND=memory cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存储数据库和日志
    pub work_dir: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// 运行环境: development | staging | production
    pub environment: String,
    /// 业务时区，所有日/周/月边界都按此计算
    pub timezone: Tz,
    pub store_backend: StoreKind,
    /// 单次存储调用超时 (毫秒)
    pub store_timeout_ms: u64,
    /// 请求超时时间 (毫秒)
    pub request_timeout_ms: u64,
    /// 关闭超时时间 (毫秒)
    pub shutdown_timeout_ms: u64,
    pub log_level: String,
    pub log_json: bool,
}

/// Read `key` and parse it, recording a warning when the value is unusable
fn parse_env<T: FromStr>(key: &str, default: T, warnings: &mut Vec<String>) -> T {
    match std::env::var(key) {
        Ok(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                warnings.push(format!("Invalid {key}='{raw}', using default"));
                default
            }
        },
        Err(_) => default,
    }
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置或无效，使用默认值
    pub fn from_env() -> Self {
        let (config, warnings) = Self::from_env_with_warnings();
        for warning in warnings {
            tracing::warn!("{}", warning);
        }
        config
    }

    /// Like [`Config::from_env`], handing back fallback warnings instead of
    /// logging them (the logger may not exist yet)
    pub fn from_env_with_warnings() -> (Self, Vec<String>) {
        let mut warnings = Vec::new();

        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());
        let is_production = environment == "production";

        let timezone = parse_env("TIMEZONE", chrono_tz::Asia::Manila, &mut warnings);
        let store_backend = match std::env::var("STORE_BACKEND") {
            Ok(raw) => raw.parse().unwrap_or_else(|e| {
                warnings.push(format!("Invalid STORE_BACKEND: {e}, using surreal"));
                StoreKind::Surreal
            }),
            Err(_) => StoreKind::Surreal,
        };

        let config = Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "./work_dir".into()),
            http_port: parse_env("HTTP_PORT", 5000, &mut warnings),
            environment,
            timezone,
            store_backend,
            store_timeout_ms: parse_env("STORE_TIMEOUT_MS", 5000, &mut warnings),
            request_timeout_ms: parse_env("REQUEST_TIMEOUT_MS", 30000, &mut warnings),
            shutdown_timeout_ms: parse_env("SHUTDOWN_TIMEOUT_MS", 10000, &mut warnings),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_json: parse_env("LOG_JSON", is_production, &mut warnings),
        };
        (config, warnings)
    }

    /// 使用自定义值覆盖部分配置
    ///
    /// 常用于测试场景
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config
    }

    pub fn database_path(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("database").join("pos.db")
    }

    pub fn log_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("logs")
    }

    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 是否开发环境
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_kind_parse() {
        assert_eq!("surreal".parse::<StoreKind>().unwrap(), StoreKind::Surreal);
        assert_eq!(" Memory ".parse::<StoreKind>().unwrap(), StoreKind::Memory);
        assert!("postgres".parse::<StoreKind>().is_err());
    }

    #[test]
    fn test_parse_env_falls_back_with_warning() {
        let mut warnings = Vec::new();
        let value: u16 = parse_env("POS_TEST_UNSET_PORT_VAR", 5000, &mut warnings);
        assert_eq!(value, 5000);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_paths_under_work_dir() {
        let mut config = Config::from_env();
        config.work_dir = "/tmp/pos".into();
        assert_eq!(config.database_path(), PathBuf::from("/tmp/pos/database/pos.db"));
        assert_eq!(config.log_dir(), PathBuf::from("/tmp/pos/logs"));
    }
}
