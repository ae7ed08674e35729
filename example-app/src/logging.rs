//! 日志初始化

use tracing::Level;
use tracing_subscriber::EnvFilter;

/// 日志配置
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: Level,
    pub show_target: bool,
    pub show_thread_ids: bool,
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self::development()
    }
}

impl LoggingConfig {
    /// 开发环境
    pub fn development() -> Self {
        Self {
            level: Level::DEBUG,
            show_target: true,
            show_thread_ids: false,
            json_format: false,
        }
    }

    /// 生产环境
    pub fn production() -> Self {
        Self {
            level: Level::INFO,
            show_target: false,
            show_thread_ids: true,
            json_format: true,
        }
    }

    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }
}

/// 解析日志级别，无法识别时使用 INFO
pub fn parse_log_level(level: &str) -> Level {
    match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

/// 初始化全局日志订阅器
///
/// 设置了 `RUST_LOG` 时以环境变量为准。
pub fn initialize_logging(config: &LoggingConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.as_str().to_lowercase()));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(config.show_target)
        .with_thread_ids(config.show_thread_ids);

    let result = if config.json_format {
        subscriber.json().try_init()
    } else {
        subscriber.try_init()
    };
    result.map_err(|e| anyhow::anyhow!("日志初始化失败: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_log_level() {
        assert_eq!(parse_log_level("WARN"), Level::WARN);
        assert_eq!(parse_log_level("trace"), Level::TRACE);
        assert_eq!(parse_log_level("verbose"), Level::INFO);
    }

    #[test]
    fn test_presets() {
        assert!(LoggingConfig::production().json_format);
        assert!(!LoggingConfig::development().json_format);
        assert_eq!(
            LoggingConfig::production().with_level(Level::ERROR).level,
            Level::ERROR
        );
    }
}
