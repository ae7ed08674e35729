//! 内置的计时处理器
//!
//! 前置处理器记录实例进入流水线的时间，后置处理器持有前置处理器的引用，
//! 取出同一实例的开始时间并记录耗时。
//!
//! 记录按组件类型保存，并附带实例标识。创建中止时留下的记录会被同类型的下一次
//! 创建覆盖，不会被其他实例取走。

use dashmap::DashMap;
use di_abstractions::{AfterAdditionHandler, BeforeAdditionHandler};
use infrastructure_common::{BeanHandle, BeanIdentity, BoxError, TypeInfo};
use parking_lot::Mutex;
use std::any::TypeId;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// 记录开始时间的前置处理器
#[derive(Debug, Default)]
pub struct LoggingBeforeAdditionHandler {
    started: DashMap<TypeId, (BeanIdentity, Instant)>,
}

impl LoggingBeforeAdditionHandler {
    /// 创建处理器
    pub fn new() -> Self {
        Self::default()
    }

    /// 取出并移除实例的开始时间
    ///
    /// 只有记录属于同一实例时才返回。
    pub fn take_start(&self, bean: &BeanHandle) -> Option<Instant> {
        let identity = bean.identity();
        self.started
            .remove_if(&bean.type_info().id, |_, (recorded, _)| *recorded == identity)
            .map(|(_, (_, started))| started)
    }

    /// 尚未被后置处理器取走的记录数
    pub fn pending(&self) -> usize {
        self.started.len()
    }
}

impl BeforeAdditionHandler for LoggingBeforeAdditionHandler {
    fn handle(&self, bean: &BeanHandle) -> Result<(), BoxError> {
        info!("开始添加组件: {}", bean.type_info().short_name());
        let previous = self
            .started
            .insert(bean.type_info().id, (bean.identity(), Instant::now()));
        if previous.is_some() {
            debug!("丢弃组件 {} 未完成创建的开始时间", bean.type_info().short_name());
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "LoggingBeforeAdditionHandler"
    }
}

/// 一次组件添加的耗时
#[derive(Debug, Clone)]
pub struct BeanTiming {
    /// 组件类型
    pub type_info: TypeInfo,
    /// 从前置处理器到后置处理器的耗时
    pub elapsed: Duration,
}

/// 计算耗时的后置处理器
#[derive(Debug)]
pub struct LoggingAfterAdditionHandler {
    before: Arc<LoggingBeforeAdditionHandler>,
    timings: Mutex<Vec<BeanTiming>>,
}

impl LoggingAfterAdditionHandler {
    /// 创建处理器，必须传入同一条流水线上的前置处理器
    pub fn new(before: Arc<LoggingBeforeAdditionHandler>) -> Self {
        Self {
            before,
            timings: Mutex::new(Vec::new()),
        }
    }

    /// 按添加顺序返回已记录的耗时
    pub fn timings(&self) -> Vec<BeanTiming> {
        self.timings.lock().clone()
    }
}

impl AfterAdditionHandler for LoggingAfterAdditionHandler {
    fn handle(&self, bean: &BeanHandle) -> Result<(), BoxError> {
        let Some(started) = self.before.take_start(bean) else {
            warn!("组件 {} 没有开始时间记录", bean.type_info().short_name());
            return Ok(());
        };

        let elapsed = started.elapsed();
        info!(
            "组件已添加: {}, 耗时 {} 微秒",
            bean.type_info().short_name(),
            elapsed.as_micros()
        );
        self.timings.lock().push(BeanTiming {
            type_info: bean.type_info().clone(),
            elapsed,
        });
        Ok(())
    }

    fn name(&self) -> &str {
        "LoggingAfterAdditionHandler"
    }
}
