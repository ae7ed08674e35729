//! Centralized integration tests for component-macros crate
//!
//! 通过 `#[component]` 注册的组件在程序启动时进入全局列表，每个测试用自己的根作用域隔离。

use di_abstractions::{ComponentDefinitionProvider, DiContainer, QualifierPolicy};
use di_impl::{DiContainerBuilder, DiContainerImpl};
use infrastructure_common::DependencyError;

mod comments {
    use component_macros::component;
    use parking_lot::Mutex;
    use std::sync::Arc;

    pub trait CommentRepository: Send + Sync {
        fn store(&self, text: &str);
        fn stored(&self) -> Vec<String>;
    }

    pub trait CommentNotifier: Send + Sync {
        fn notify(&self, text: &str) -> String;
    }

    #[derive(Default)]
    pub struct FileRepository {
        items: Mutex<Vec<String>>,
    }

    #[component(qualifier = "file", provides(dyn CommentRepository))]
    impl FileRepository {
        pub fn new() -> Self {
            Self::default()
        }
    }

    impl CommentRepository for FileRepository {
        fn store(&self, text: &str) {
            self.items.lock().push(text.to_string());
        }

        fn stored(&self) -> Vec<String> {
            self.items.lock().clone()
        }
    }

    #[derive(Default)]
    pub struct DbRepository {
        items: Mutex<Vec<String>>,
    }

    #[component(qualifier = "db", provides(dyn CommentRepository))]
    impl DbRepository {
        pub fn new() -> Self {
            Self::default()
        }
    }

    impl CommentRepository for DbRepository {
        fn store(&self, text: &str) {
            self.items.lock().push(text.to_string());
        }

        fn stored(&self) -> Vec<String> {
            self.items.lock().clone()
        }
    }

    pub struct EmailNotifier;

    #[component(provides(dyn CommentNotifier))]
    impl EmailNotifier {
        pub fn new() -> Self {
            EmailNotifier
        }
    }

    impl CommentNotifier for EmailNotifier {
        fn notify(&self, text: &str) -> String {
            format!("email: {text}")
        }
    }

    pub struct CommentService {
        repository: Option<Arc<dyn CommentRepository>>,
        notifier: Option<Arc<dyn CommentNotifier>>,
        pub hooks: Mutex<Vec<&'static str>>,
    }

    #[component]
    impl CommentService {
        pub fn new() -> Self {
            Self {
                repository: None,
                notifier: None,
                hooks: Mutex::new(Vec::new()),
            }
        }

        #[autowired]
        pub fn with_dependencies(
            #[qualifier("file")] repository: Arc<dyn CommentRepository>,
            notifier: Arc<dyn CommentNotifier>,
        ) -> Self {
            Self {
                repository: Some(repository),
                notifier: Some(notifier),
                hooks: Mutex::new(Vec::new()),
            }
        }

        #[post_construct]
        fn connect(&self) {
            self.hooks.lock().push("connect");
        }

        #[post_construct]
        fn warm_up(&self) -> Result<(), std::io::Error> {
            self.hooks.lock().push("warm_up");
            Ok(())
        }

        pub fn publish(&self, text: &str) -> Option<String> {
            self.repository.as_ref()?.store(text);
            self.notifier.as_ref().map(|notifier| notifier.notify(text))
        }

        pub fn is_wired(&self) -> bool {
            self.repository.is_some() && self.notifier.is_some()
        }
    }
}

mod cyclic {
    use component_macros::component;
    use std::sync::Arc;

    pub struct A;
    pub struct B;

    #[component]
    impl A {
        pub fn new(_b: Arc<B>) -> Self {
            A
        }
    }

    #[component]
    impl B {
        pub fn new(_a: Arc<A>) -> Self {
            B
        }
    }
}

mod fallible {
    use component_macros::component;

    pub struct Flaky;

    #[component]
    impl Flaky {
        pub fn connect() -> Result<Self, std::io::Error> {
            Err(std::io::Error::new(std::io::ErrorKind::Other, "connection refused"))
        }
    }
}

fn container(scope: &str) -> DiContainerImpl {
    DiContainerBuilder::new(scope).build().unwrap()
}

#[test]
fn test_macro_components_route_storage_to_qualified_repository() {
    let container = container("integration_tests::comments");

    let service = container.get_bean::<comments::CommentService>().unwrap();
    let receipt = service.publish("hello");

    assert_eq!(receipt.as_deref(), Some("email: hello"));
    let file = container.get_bean::<comments::FileRepository>().unwrap();
    let db = container.get_bean::<comments::DbRepository>().unwrap();
    assert_eq!(comments::CommentRepository::stored(&*file), ["hello"]);
    assert!(comments::CommentRepository::stored(&*db).is_empty());
}

#[test]
fn test_autowired_constructor_and_post_construct_order() {
    let container = container("integration_tests::comments");

    let service = container.get_bean::<comments::CommentService>().unwrap();

    assert!(service.is_wired());
    assert_eq!(*service.hooks.lock(), ["connect", "warm_up"]);
}

#[test]
fn test_global_components_are_sorted_by_type_path() {
    let container = container("integration_tests::comments");
    container.initialize().unwrap();

    let names: Vec<_> = container
        .registered_components()
        .iter()
        .map(|info| info.short_name().to_string())
        .collect();
    assert_eq!(
        names,
        ["CommentService", "DbRepository", "EmailNotifier", "FileRepository"]
    );
}

#[test]
fn test_explicit_registration_comes_first_and_shadows_global() {
    let container = DiContainerBuilder::new("integration_tests::comments")
        .register(comments::EmailNotifier::component_definition())
        .build()
        .unwrap();
    container.initialize().unwrap();

    let components = container.registered_components();
    assert_eq!(components.len(), 4);
    assert_eq!(components[0].short_name(), "EmailNotifier");
}

#[test]
fn test_strict_policy_with_matching_qualifier_succeeds() {
    let container = DiContainerBuilder::new("integration_tests::comments")
        .qualifier_policy(QualifierPolicy::Strict)
        .build()
        .unwrap();

    assert!(container.initialize().is_ok());
    assert_eq!(container.stats().active_singletons, 4);
}

#[test]
fn test_get_bean_does_not_retry_failed_initialization() {
    let container = container("integration_tests::fallible");

    assert!(matches!(
        container.get_bean::<comments::CommentService>(),
        Err(DependencyError::BeanCreationFailed { .. })
    ));
    assert!(matches!(
        container.get_bean::<comments::CommentService>(),
        Err(DependencyError::BeanNotFound { .. })
    ));
}

#[test]
fn test_macro_cycle_is_detected() {
    let container = container("integration_tests::cyclic");

    match container.initialize() {
        Err(DependencyError::CircularDependency { stack }) => {
            assert_eq!(stack.len(), 3);
            assert_eq!(stack.first(), stack.last());
        }
        other => panic!("expected circular dependency, got {other:?}"),
    }
    assert!(matches!(
        container.get_bean::<cyclic::A>(),
        Err(DependencyError::BeanNotFound { .. })
    ));
}

#[test]
fn test_fallible_constructor_error_is_wrapped() {
    let container = container("integration_tests::fallible");

    match container.initialize() {
        Err(DependencyError::BeanCreationFailed { type_name, source }) => {
            assert!(type_name.ends_with("Flaky"));
            assert!(source.to_string().contains("connection refused"));
        }
        other => panic!("expected creation failure, got {other:?}"),
    }
}

#[test]
fn test_global_components_can_be_excluded() {
    let container = DiContainerBuilder::new("integration_tests::comments")
        .include_global_components(false)
        .build()
        .unwrap();

    assert!(matches!(
        container.get_bean::<comments::CommentService>(),
        Err(DependencyError::BeanNotFound { .. })
    ));
    assert_eq!(container.stats().registered_components, 0);
}
