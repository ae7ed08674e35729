//! # 示例应用程序
//!
//! 演示评论服务的组件装配：`#[component]` 注册组件，容器按根作用域发现并创建单例，
//! 评论服务通过限定符 `file` 选中文件存储。

mod logging;
mod model;
mod proxies;
mod repositories;
mod services;

use crate::logging::{initialize_logging, parse_log_level, LoggingConfig};
use crate::model::Comment;
use crate::services::CommentService;
use anyhow::Context;
use clap::Parser;
use di_abstractions::{ContainerConfig, DiContainer, QualifierPolicy};
use di_impl::{DiContainerImpl, LoggingAfterAdditionHandler, LoggingBeforeAdditionHandler};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

const DEFAULT_ROOT_SCOPE: &str = "example_app";

/// 命令行参数
#[derive(Parser, Debug)]
#[command(name = "example-app")]
#[command(about = "依赖注入容器示例应用")]
struct Args {
    /// 容器配置文件路径（TOML 或 JSON）
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// 组件根作用域，未指定时使用配置文件中的值或 `example_app`
    #[arg(long)]
    root_scope: Option<String>,

    /// 限定符不匹配时报错而不是回退
    #[arg(long)]
    strict_qualifiers: bool,

    /// 日志级别
    #[arg(long, default_value = "info")]
    log_level: String,

    /// 以 JSON 格式输出日志
    #[arg(long)]
    json_logs: bool,

    /// 评论作者
    #[arg(long, default_value = "Dmytro")]
    author: String,

    /// 评论内容
    #[arg(long, default_value = "Demo comment")]
    text: String,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let logging = if args.json_logs {
        LoggingConfig::production()
    } else {
        LoggingConfig::development()
    };
    initialize_logging(&logging.with_level(parse_log_level(&args.log_level)))?;

    info!("启动示例应用");

    let container = build_container(&args)?;
    container.initialize().context("容器初始化失败")?;

    let stats = container.stats();
    info!(
        "容器就绪: {} 个组件, {} 个单例",
        stats.registered_components, stats.active_singletons
    );

    let service = container
        .get_bean::<CommentService>()
        .context("获取评论服务失败")?;
    let comment = Comment::new(args.author, args.text);
    let notification = service.publish_comment(&comment);
    info!("评论已发布: {} ({})", comment, notification);

    Ok(())
}

/// 构建容器并挂上计时处理器
fn build_container(args: &Args) -> anyhow::Result<DiContainerImpl> {
    let mut config = match &args.config {
        Some(path) => ContainerConfig::from_file(path)
            .with_context(|| format!("无法加载配置文件 {}", path.display()))?,
        None => ContainerConfig::default(),
    };
    if let Some(root_scope) = &args.root_scope {
        config.root_scope = root_scope.clone();
    } else if config.root_scope.trim().is_empty() {
        config.root_scope = DEFAULT_ROOT_SCOPE.to_string();
    }
    if args.strict_qualifiers {
        config.qualifier_policy = QualifierPolicy::Strict;
    }

    let before = Arc::new(LoggingBeforeAdditionHandler::new());
    let after = Arc::new(LoggingAfterAdditionHandler::new(before.clone()));

    let container = DiContainerImpl::builder(config.root_scope.clone())
        .with_config(config)
        .add_before_handler(before)
        .add_after_handler(after)
        .build()?;
    Ok(container)
}
