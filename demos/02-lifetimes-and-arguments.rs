// note: this example assumes you've analyzed the previous one

use std::sync::Arc;
use wireup::constructor::{ConstructorDefinition, Parameter};
use wireup::descriptor::Arguments;
use wireup::instance_provider::{ServiceInstancePtr, TypedServiceInstanceProvider};
use wireup::provider::ServiceProvider;
use wireup::registry::OrderedServiceRegistry;
use wireup::service::Constructible;

struct Clock;

impl Constructible for Clock {
    fn constructors() -> Vec<ConstructorDefinition> {
        vec![ConstructorDefinition::new(vec![], |_| Ok(Clock))]
    }
}

struct ConnectionString(String);

struct Database {
    clock: ServiceInstancePtr<Clock>,
    connection: ServiceInstancePtr<ConnectionString>,
}

impl Constructible for Database {
    fn constructors() -> Vec<ConstructorDefinition> {
        vec![ConstructorDefinition::new(
            vec![
                Parameter::required::<Clock>(),
                Parameter::required::<ConnectionString>(),
            ],
            |parameters| {
                Ok(Database {
                    clock: parameters.take()?,
                    connection: parameters.take()?,
                })
            },
        )]
    }
}

fn main() {
    let registry = OrderedServiceRegistry::new()
        .with_self_singleton::<Clock>()
        // values supplied at registration time are matched to constructor
        // parameters by exact type, before any registered service
        .with_self_transient_args::<Database>(
            Arguments::new().with(ConnectionString("postgres://localhost".to_string())),
        );

    let provider = ServiceProvider::new(Box::new(registry));

    let first = provider.get_service::<Database>().unwrap();
    let second = provider.get_service::<Database>().unwrap();

    // transients are fresh instances...
    assert!(!Arc::ptr_eq(&first, &second));
    // ...while their singleton dependencies are shared
    assert!(Arc::ptr_eq(&first.clock, &second.clock));

    println!("connected to {}", first.connection.0);
}
