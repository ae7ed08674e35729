//! 生命周期流水线
//!
//! 按注册顺序调用前置和后置处理器，再按声明顺序调用 post-construct 钩子。
//! 处理器之间没有隔离，任一处理器失败都会中止当前实例的创建。

use di_abstractions::{AfterAdditionHandler, BeforeAdditionHandler, ComponentDefinition};
use infrastructure_common::{BeanHandle, DependencyError};
use std::sync::Arc;
use tracing::debug;

/// 生命周期流水线
#[derive(Clone, Default)]
pub struct LifecyclePipeline {
    before: Vec<Arc<dyn BeforeAdditionHandler>>,
    after: Vec<Arc<dyn AfterAdditionHandler>>,
}

impl LifecyclePipeline {
    /// 创建空流水线
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加前置处理器
    pub fn add_before_handler(&mut self, handler: Arc<dyn BeforeAdditionHandler>) {
        self.before.push(handler);
    }

    /// 添加后置处理器
    pub fn add_after_handler(&mut self, handler: Arc<dyn AfterAdditionHandler>) {
        self.after.push(handler);
    }

    /// 前置处理器数量
    pub fn before_count(&self) -> usize {
        self.before.len()
    }

    /// 后置处理器数量
    pub fn after_count(&self) -> usize {
        self.after.len()
    }

    /// 执行前置处理器，实例此时还不在缓存中
    pub fn before_addition(&self, bean: &BeanHandle) -> Result<(), DependencyError> {
        for handler in &self.before {
            debug!("前置处理器 {} 处理 {}", handler.name(), bean.type_info());
            handler
                .handle(bean)
                .map_err(|source| DependencyError::creation_failed(bean.type_info().to_string(), source))?;
        }
        Ok(())
    }

    /// 执行后置处理器，实例此时已在缓存中
    pub fn after_addition(&self, bean: &BeanHandle) -> Result<(), DependencyError> {
        for handler in &self.after {
            debug!("后置处理器 {} 处理 {}", handler.name(), bean.type_info());
            handler
                .handle(bean)
                .map_err(|source| DependencyError::creation_failed(bean.type_info().to_string(), source))?;
        }
        Ok(())
    }

    /// 按声明顺序执行组件的 post-construct 钩子
    pub fn post_construct(
        &self,
        definition: &ComponentDefinition,
        bean: &BeanHandle,
    ) -> Result<(), DependencyError> {
        for hook in definition.post_construct_hooks() {
            debug!("调用 post-construct 钩子 {}::{}", bean.type_info().short_name(), hook.name());
            hook.invoke(bean.instance())
                .map_err(|source| DependencyError::creation_failed(bean.type_info().to_string(), source))?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for LifecyclePipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LifecyclePipeline")
            .field("before", &self.before.iter().map(|h| h.name()).collect::<Vec<_>>())
            .field("after", &self.after.iter().map(|h| h.name()).collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use infrastructure_common::{BoxError, TypeInfo};
    use parking_lot::Mutex;

    struct Widget;

    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<String>>,
    }

    struct Tagged {
        tag: &'static str,
        recorder: Arc<Recorder>,
        fail: bool,
    }

    impl BeforeAdditionHandler for Tagged {
        fn handle(&self, _bean: &BeanHandle) -> Result<(), BoxError> {
            self.recorder.events.lock().push(format!("before:{}", self.tag));
            if self.fail {
                return Err("rejected".into());
            }
            Ok(())
        }
    }

    impl AfterAdditionHandler for Tagged {
        fn handle(&self, _bean: &BeanHandle) -> Result<(), BoxError> {
            self.recorder.events.lock().push(format!("after:{}", self.tag));
            Ok(())
        }
    }

    fn handle() -> BeanHandle {
        BeanHandle::new(TypeInfo::of::<Widget>(), Arc::new(Widget))
    }

    fn tagged(tag: &'static str, recorder: &Arc<Recorder>, fail: bool) -> Arc<Tagged> {
        Arc::new(Tagged {
            tag,
            recorder: recorder.clone(),
            fail,
        })
    }

    #[test]
    fn handlers_run_in_registration_order() {
        let recorder = Arc::new(Recorder::default());
        let mut pipeline = LifecyclePipeline::new();
        pipeline.add_before_handler(tagged("1", &recorder, false));
        pipeline.add_before_handler(tagged("2", &recorder, false));
        pipeline.add_after_handler(tagged("3", &recorder, false));

        pipeline.before_addition(&handle()).unwrap();
        pipeline.after_addition(&handle()).unwrap();

        assert_eq!(*recorder.events.lock(), ["before:1", "before:2", "after:3"]);
        assert_eq!((pipeline.before_count(), pipeline.after_count()), (2, 1));
    }

    #[test]
    fn failing_handler_stops_the_chain() {
        let recorder = Arc::new(Recorder::default());
        let mut pipeline = LifecyclePipeline::new();
        pipeline.add_before_handler(tagged("bad", &recorder, true));
        pipeline.add_before_handler(tagged("never", &recorder, false));

        let result = pipeline.before_addition(&handle());

        assert!(matches!(result, Err(DependencyError::BeanCreationFailed { .. })));
        assert_eq!(*recorder.events.lock(), ["before:bad"]);
    }

    #[test]
    fn post_construct_hooks_run_in_declaration_order() {
        let recorder = Arc::new(Recorder::default());
        let (first, second) = (recorder.clone(), recorder.clone());
        let definition = ComponentDefinition::builder::<Widget>()
            .constructor("new", Vec::new(), |_| Ok(Widget))
            .post_construct("load", move |_: &Widget| {
                first.events.lock().push("load".to_string());
                Ok(())
            })
            .post_construct("warm_up", move |_: &Widget| {
                second.events.lock().push("warm_up".to_string());
                Ok(())
            })
            .build();

        LifecyclePipeline::new().post_construct(&definition, &handle()).unwrap();

        assert_eq!(*recorder.events.lock(), ["load", "warm_up"]);
    }
}
