//! A minimal dependency injection container: services are registered in an
//! ordered descriptor registry and resolved on demand, with constructors
//! selected greedily based on which dependencies are currently satisfiable.
//!
//! Registration happens through the fluent API of
//! [OrderedServiceRegistry](registry::OrderedServiceRegistry); resolution
//! through a [ServiceProvider](provider::ServiceProvider) consuming the
//! frozen registry:
//!
//! ```
//! use wireup::constructor::{ConstructorDefinition, Parameter};
//! use wireup::instance_provider::{ServiceInstancePtr, TypedServiceInstanceProvider};
//! use wireup::provider::ServiceProvider;
//! use wireup::registry::OrderedServiceRegistry;
//! use wireup::service::Constructible;
//! use wireup::{injectable, service_alias};
//!
//! trait Greeter: Send + Sync {
//!     fn greet(&self) -> String;
//! }
//!
//! struct EnglishGreeter;
//!
//! impl Greeter for EnglishGreeter {
//!     fn greet(&self) -> String {
//!         "hello".to_string()
//!     }
//! }
//!
//! impl Constructible for EnglishGreeter {
//!     fn constructors() -> Vec<ConstructorDefinition> {
//!         vec![ConstructorDefinition::new(vec![], |_| Ok(EnglishGreeter))]
//!     }
//! }
//!
//! injectable!(dyn Greeter + Send + Sync);
//! service_alias!(dyn Greeter + Send + Sync => EnglishGreeter);
//!
//! struct Doorman {
//!     greeter: ServiceInstancePtr<dyn Greeter + Send + Sync>,
//! }
//!
//! impl Constructible for Doorman {
//!     fn constructors() -> Vec<ConstructorDefinition> {
//!         vec![ConstructorDefinition::new(
//!             vec![Parameter::required::<dyn Greeter + Send + Sync>()],
//!             |parameters| {
//!                 Ok(Doorman {
//!                     greeter: parameters.take()?,
//!                 })
//!             },
//!         )]
//!     }
//! }
//!
//! let registry = OrderedServiceRegistry::default()
//!     .with_singleton::<dyn Greeter + Send + Sync, EnglishGreeter>()
//!     .with_self_transient::<Doorman>();
//!
//! let provider = ServiceProvider::new(Box::new(registry));
//! let doorman = provider.get_service::<Doorman>().unwrap();
//! assert_eq!(doorman.greeter.greet(), "hello");
//! ```

pub mod constructor;
pub mod descriptor;
mod error;
pub mod instance_provider;
mod macros;
pub mod provider;
pub mod registry;
pub mod service;

pub use error::ServiceResolutionError;
