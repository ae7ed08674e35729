//! Centralized integration tests for di-impl crate
//!
//! 生命周期处理器、并发读取和配置文件加载

use di_abstractions::{
    AfterAdditionHandler, BeforeAdditionHandler, ComponentDefinition, ContainerConfig, Dependency,
    DiContainer, QualifierPolicy,
};
use di_impl::{
    DiContainerBuilder, DiContainerImpl, LoggingAfterAdditionHandler, LoggingBeforeAdditionHandler,
    SingletonCache,
};
use infrastructure_common::{BeanHandle, BoxError, DependencyError};
use parking_lot::Mutex;
use std::io::Write;
use std::sync::Arc;

struct Clock;

struct Journal {
    clock: Arc<Clock>,
}

fn clock() -> ComponentDefinition {
    ComponentDefinition::builder::<Clock>()
        .constructor("new", Vec::new(), |_| Ok(Clock))
        .build()
}

fn journal() -> ComponentDefinition {
    ComponentDefinition::builder::<Journal>()
        .constructor("new", vec![Dependency::concrete::<Clock>()], |args| {
            Ok(Journal {
                clock: args.get::<Clock>(0)?,
            })
        })
        .build()
}

fn builder() -> DiContainerBuilder {
    DiContainerBuilder::new(module_path!()).include_global_components(false)
}

/// 记录处理器看到的事件，以及事件发生时实例是否已在缓存中
struct VisibilityProbe {
    phase: &'static str,
    cache: Mutex<Option<Arc<SingletonCache>>>,
    events: Arc<Mutex<Vec<(String, &'static str, bool)>>>,
}

impl VisibilityProbe {
    fn new(phase: &'static str, events: Arc<Mutex<Vec<(String, &'static str, bool)>>>) -> Arc<Self> {
        Arc::new(Self {
            phase,
            cache: Mutex::new(None),
            events,
        })
    }

    fn attach(&self, container: &DiContainerImpl) {
        *self.cache.lock() = Some(container.singletons());
    }

    fn record(&self, bean: &BeanHandle) -> Result<(), BoxError> {
        let visible = self
            .cache
            .lock()
            .as_ref()
            .is_some_and(|cache| cache.contains(bean.type_info().id));
        self.events
            .lock()
            .push((bean.type_info().short_name().to_string(), self.phase, visible));
        Ok(())
    }
}

impl BeforeAdditionHandler for VisibilityProbe {
    fn handle(&self, bean: &BeanHandle) -> Result<(), BoxError> {
        self.record(bean)
    }
}

impl AfterAdditionHandler for VisibilityProbe {
    fn handle(&self, bean: &BeanHandle) -> Result<(), BoxError> {
        self.record(bean)
    }
}

struct Rejecting;

impl AfterAdditionHandler for Rejecting {
    fn handle(&self, bean: &BeanHandle) -> Result<(), BoxError> {
        if bean.downcast_ref::<Journal>().is_some() {
            return Err("journal rejected".into());
        }
        Ok(())
    }
}

struct RejectingBefore;

impl BeforeAdditionHandler for RejectingBefore {
    fn handle(&self, bean: &BeanHandle) -> Result<(), BoxError> {
        if bean.downcast_ref::<Journal>().is_some() {
            return Err("journal vetoed".into());
        }
        Ok(())
    }
}

#[test]
fn test_before_handler_runs_before_instance_is_visible() {
    let events = Arc::new(Mutex::new(Vec::new()));
    let before = VisibilityProbe::new("before", events.clone());
    let after = VisibilityProbe::new("after", events.clone());
    let mut container = builder().register(journal()).register(clock()).build().unwrap();
    container.add_before_handler(before.clone());
    container.add_after_handler(after.clone());
    before.attach(&container);
    after.attach(&container);

    container.initialize().unwrap();

    let events = events.lock().clone();
    assert_eq!(
        events,
        vec![
            ("Clock".to_string(), "before", false),
            ("Clock".to_string(), "after", true),
            ("Journal".to_string(), "before", false),
            ("Journal".to_string(), "after", true),
        ]
    );
}

#[test]
fn test_timing_handlers_share_state_through_explicit_reference() {
    let before = Arc::new(LoggingBeforeAdditionHandler::new());
    let after = Arc::new(LoggingAfterAdditionHandler::new(before.clone()));
    let container = builder()
        .register(clock())
        .register(journal())
        .add_before_handler(before.clone())
        .add_after_handler(after.clone())
        .build()
        .unwrap();

    container.initialize().unwrap();

    let timed: Vec<_> = after
        .timings()
        .iter()
        .map(|timing| timing.type_info.short_name().to_string())
        .collect();
    assert_eq!(timed, ["Clock", "Journal"]);
    assert_eq!(before.pending(), 0);
    let stats = container.stats();
    assert_eq!((stats.before_handlers, stats.after_handlers), (1, 1));
}

#[test]
fn test_failing_after_handler_evicts_instance() {
    let container = builder()
        .register(clock())
        .register(journal())
        .add_after_handler(Arc::new(Rejecting))
        .build()
        .unwrap();

    let result = container.initialize();

    assert!(matches!(result, Err(DependencyError::BeanCreationFailed { .. })));
    assert!(container.get_bean::<Clock>().is_ok());
    assert!(matches!(
        container.get_bean::<Journal>(),
        Err(DependencyError::BeanNotFound { .. })
    ));
}

#[test]
fn test_failing_before_handler_aborts_initialization_without_caching() {
    let timing_before = Arc::new(LoggingBeforeAdditionHandler::new());
    let timing_after = Arc::new(LoggingAfterAdditionHandler::new(timing_before.clone()));
    let container = builder()
        .register(clock())
        .register(journal())
        .add_before_handler(Arc::new(RejectingBefore))
        .add_before_handler(timing_before.clone())
        .add_after_handler(timing_after.clone())
        .build()
        .unwrap();

    match container.initialize() {
        Err(DependencyError::BeanCreationFailed { type_name, source }) => {
            assert!(type_name.ends_with("Journal"));
            assert!(source.to_string().contains("journal vetoed"));
        }
        other => panic!("expected creation failure, got {other:?}"),
    }

    assert!(container.singletons().contains(std::any::TypeId::of::<Clock>()));
    assert!(!container.singletons().contains(std::any::TypeId::of::<Journal>()));
    assert!(matches!(
        container.get_bean::<Journal>(),
        Err(DependencyError::BeanNotFound { .. })
    ));
    assert_eq!(timing_before.pending(), 0);
    assert_eq!(timing_after.timings().len(), 1);
}

#[test]
fn test_concurrent_reads_return_same_instance() {
    let container = builder().register(clock()).register(journal()).build().unwrap();
    container.initialize().unwrap();
    let expected = container.get_bean::<Journal>().unwrap();

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| scope.spawn(|| container.get_bean::<Journal>().unwrap()))
            .collect();
        for handle in handles {
            let journal = handle.join().unwrap();
            assert!(Arc::ptr_eq(&journal, &expected));
        }
    });

    let clock = container.get_bean::<Clock>().unwrap();
    assert!(Arc::ptr_eq(&expected.clock, &clock));
}

#[test]
fn test_concurrent_first_access_initializes_once() {
    let before = Arc::new(LoggingBeforeAdditionHandler::new());
    let after = Arc::new(LoggingAfterAdditionHandler::new(before.clone()));
    let container = builder()
        .register(clock())
        .add_before_handler(before)
        .add_after_handler(after.clone())
        .build()
        .unwrap();

    std::thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| container.get_bean::<Clock>().unwrap());
        }
    });

    assert_eq!(after.timings().len(), 1);
}

#[test]
fn test_config_file_drives_container() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("container.toml");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "root_scope = \"{}\"", module_path!()).unwrap();
    writeln!(file, "qualifier_policy = \"strict\"").unwrap();
    writeln!(file, "max_resolution_depth = 1").unwrap();
    writeln!(file, "include_global_components = false").unwrap();
    drop(file);

    let config = ContainerConfig::from_file(&path).unwrap();
    assert_eq!(config.qualifier_policy, QualifierPolicy::Strict);
    let container = DiContainerBuilder::new("")
        .with_config(config)
        .register(journal())
        .register(clock())
        .build()
        .unwrap();

    assert!(matches!(
        container.initialize(),
        Err(DependencyError::ResolutionDepthExceeded { max_depth: 1, .. })
    ));
}
