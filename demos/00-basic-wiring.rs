use wireup::constructor::{ConstructorDefinition, Parameter};
use wireup::instance_provider::{ServiceInstancePtr, TypedServiceInstanceProvider};
use wireup::provider::ServiceProvider;
use wireup::registry::OrderedServiceRegistry;
use wireup::service::Constructible;
use wireup::{injectable, service_alias};

trait MessageSink: Send + Sync {
    fn accept(&self, message: &str);
}

struct ConsoleSink;

impl MessageSink for ConsoleSink {
    fn accept(&self, message: &str) {
        println!("{message}");
    }
}

impl Constructible for ConsoleSink {
    fn constructors() -> Vec<ConstructorDefinition> {
        vec![ConstructorDefinition::new(vec![], |_| Ok(ConsoleSink))]
    }
}

// each trait used as a service type needs a marker impl and an alias tying it
// to the concrete implementation
injectable!(dyn MessageSink + Send + Sync);
service_alias!(dyn MessageSink + Send + Sync => ConsoleSink);

struct Publisher {
    sink: ServiceInstancePtr<dyn MessageSink + Send + Sync>,
}

impl Publisher {
    fn publish(&self) {
        self.sink.accept("Hello world!");
    }
}

impl Constructible for Publisher {
    fn constructors() -> Vec<ConstructorDefinition> {
        vec![ConstructorDefinition::new(
            vec![Parameter::required::<dyn MessageSink + Send + Sync>()],
            |parameters| {
                Ok(Publisher {
                    sink: parameters.take()?,
                })
            },
        )]
    }
}

fn main() {
    let registry = OrderedServiceRegistry::new()
        .with_singleton::<dyn MessageSink + Send + Sync, ConsoleSink>()
        .with_self_transient::<Publisher>();

    let provider = ServiceProvider::new(Box::new(registry));
    let publisher = provider
        .get_service::<Publisher>()
        .expect("error resolving Publisher");

    // prints "Hello world!"
    publisher.publish();
}
