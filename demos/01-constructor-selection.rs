// note: this example assumes you've analyzed the previous one

use wireup::constructor::{ConstructorDefinition, Parameter};
use wireup::instance_provider::TypedServiceInstanceProvider;
use wireup::provider::ServiceProvider;
use wireup::registry::OrderedServiceRegistry;
use wireup::service::Constructible;

struct Engine;

impl Constructible for Engine {
    fn constructors() -> Vec<ConstructorDefinition> {
        vec![ConstructorDefinition::new(vec![], |_| Ok(Engine))]
    }
}

struct Turbocharger;

impl Constructible for Turbocharger {
    fn constructors() -> Vec<ConstructorDefinition> {
        vec![ConstructorDefinition::new(vec![], |_| Ok(Turbocharger))]
    }
}

struct Car {
    description: &'static str,
}

impl Constructible for Car {
    // two constructors: the resolver greedily picks the one with the most
    // parameters satisfiable by current registrations, so the fully wired
    // variant wins automatically once a Turbocharger is registered
    fn constructors() -> Vec<ConstructorDefinition> {
        vec![
            ConstructorDefinition::new(vec![Parameter::required::<Engine>()], |parameters| {
                parameters.take::<Engine>()?;
                Ok(Car {
                    description: "a plain car",
                })
            }),
            ConstructorDefinition::new(
                vec![
                    Parameter::required::<Engine>(),
                    Parameter::required::<Turbocharger>(),
                ],
                |parameters| {
                    parameters.take::<Engine>()?;
                    parameters.take::<Turbocharger>()?;
                    Ok(Car {
                        description: "a turbocharged car",
                    })
                },
            ),
        ]
    }
}

fn main() {
    let plain_provider = ServiceProvider::new(Box::new(
        OrderedServiceRegistry::new()
            .with_self_transient::<Engine>()
            .with_self_transient::<Car>(),
    ));

    // prints "a plain car"
    println!(
        "{}",
        plain_provider.get_service::<Car>().unwrap().description
    );

    let turbo_provider = ServiceProvider::new(Box::new(
        OrderedServiceRegistry::new()
            .with_self_transient::<Engine>()
            .with_self_transient::<Turbocharger>()
            .with_self_transient::<Car>(),
    ));

    // prints "a turbocharged car"
    println!(
        "{}",
        turbo_provider.get_service::<Car>().unwrap().description
    );
}
