use component_macros::component;
use di_abstractions::DiContainer;
use di_impl::DiContainerBuilder;
use std::sync::Arc;

pub trait Greeter: Send + Sync {
    fn greet(&self) -> String;
}

pub struct English;

#[component(qualifier = "en", provides(dyn Greeter))]
impl English {
    pub fn new() -> Self {
        English
    }
}

impl Greeter for English {
    fn greet(&self) -> String {
        "hello".to_string()
    }
}

pub struct Host {
    greeter: Arc<dyn Greeter>,
}

#[component]
impl Host {
    #[autowired]
    pub fn new(#[qualifier("en")] greeter: Arc<dyn Greeter>) -> Self {
        Host { greeter }
    }
}

fn main() {
    let container = DiContainerBuilder::new(module_path!()).build().unwrap();
    let host = container.get_bean::<Host>().unwrap();
    assert_eq!(host.greeter.greet(), "hello");
}
