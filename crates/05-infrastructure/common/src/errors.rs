//! 错误类型定义

use thiserror::Error;

/// 装箱的通用错误类型
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件不存在: {path}")]
    FileNotFound { path: String },

    #[error("配置文件读取失败: {source}")]
    FileReadError {
        #[from]
        source: std::io::Error,
    },

    #[error("配置解析失败: {source}")]
    ParseError { source: BoxError },

    #[error("配置验证失败: {message}")]
    ValidationError { message: String },
}

impl ConfigError {
    /// 创建解析错误
    pub fn parse_error(source: impl Into<BoxError>) -> Self {
        Self::ParseError {
            source: source.into(),
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(source: serde_json::Error) -> Self {
        Self::parse_error(source)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(source: toml::de::Error) -> Self {
        Self::parse_error(source)
    }
}

/// 依赖注入错误类型
#[derive(Error, Debug)]
pub enum DependencyError {
    #[error("未找到接口实现: {interface}")]
    NoImplementationFound { interface: String },

    #[error("检测到循环依赖: {}", stack.join(" -> "))]
    CircularDependency {
        /// 完整的创建链，最后一项是重新进入的类型
        stack: Vec<String>,
    },

    #[error("组件创建失败: {type_name}, 原因: {source}")]
    BeanCreationFailed {
        type_name: String,
        #[source]
        source: BoxError,
    },

    #[error("组件未找到: {type_name}")]
    BeanNotFound { type_name: String },

    #[error("限定符不匹配: 接口 {interface} 没有限定符为 \"{qualifier}\" 的实现")]
    QualifierMismatch { interface: String, qualifier: String },

    #[error("参数类型不匹配: 第 {index} 个参数, 期望 {expected}")]
    ArgumentMismatch { index: usize, expected: String },

    #[error("解析深度超过上限 {max_depth}: {type_name}")]
    ResolutionDepthExceeded { type_name: String, max_depth: usize },

    #[error("组件发现失败: {source}")]
    DiscoveryFailed {
        #[from]
        source: ComponentError,
    },

    #[error("容器初始化已失败: {message}")]
    InitializationFailed { message: String },

    #[error("容器配置无效: {source}")]
    InvalidConfiguration {
        #[from]
        source: ConfigError,
    },
}

impl DependencyError {
    /// 创建组件创建失败错误
    pub fn creation_failed(type_name: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::BeanCreationFailed {
            type_name: type_name.into(),
            source: source.into(),
        }
    }

    /// 创建组件未找到错误
    pub fn not_found(type_name: impl Into<String>) -> Self {
        Self::BeanNotFound {
            type_name: type_name.into(),
        }
    }
}

/// 组件错误类型
#[derive(Error, Debug)]
pub enum ComponentError {
    #[error("组件扫描失败: {scope}, 原因: {message}")]
    ScanError { scope: String, message: String },

    #[error("组件注册失败: {type_name}, 原因: {message}")]
    RegistrationError { type_name: String, message: String },
}

impl ComponentError {
    /// 创建扫描错误
    pub fn scan_error(scope: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ScanError {
            scope: scope.into(),
            message: message.into(),
        }
    }

    /// 创建注册错误
    pub fn registration_error(type_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::RegistrationError {
            type_name: type_name.into(),
            message: message.into(),
        }
    }
}

/// 结果类型别名
pub type ConfigResult<T> = Result<T, ConfigError>;
pub type DependencyResult<T> = Result<T, DependencyError>;
