use component_macros::Injectable;
use di_abstractions::{ComponentRegistry, ContextExt, Injectable, Provider};
use di_impl::ContextConfig;
use std::sync::Arc;

trait Engine: Send + Sync {}

struct V8;
impl Engine for V8 {}

#[derive(Injectable)]
#[component(singleton)]
struct Car {
    #[inject]
    #[named("main")]
    engine: Arc<dyn Engine>,
    #[inject]
    spare: Provider<dyn Engine>,
    mileage: u64,
}

fn main() {
    assert_eq!(Car::descriptor().scopes.len(), 1);

    let engine: Arc<dyn Engine> = Arc::new(V8);
    let mut config = ContextConfig::new();
    config
        .bind_instance(Arc::clone(&engine))
        .bind_instance_qualified(Arc::clone(&engine), &[di_abstractions::Qualifier::named("main")]);
    config.bind_type::<Car, Car>().unwrap();

    let context = config.get_context().unwrap();
    let car: Arc<Car> = context.resolve().unwrap().unwrap();
    assert!(Arc::ptr_eq(&car.engine, &engine));
    assert!(Arc::ptr_eq(&car.spare.get().unwrap(), &engine));
    assert_eq!(car.mileage, 0);
}
