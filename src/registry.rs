//! Registration of service descriptors.
//! [ServiceProvider](crate::provider::ServiceProvider)s consume a frozen
//! registry to produce live instances. No dependency-graph validation
//! happens at registration time - unresolved or cyclic dependencies are only
//! discovered when resolving.

use crate::descriptor::{Arguments, ServiceDescriptor, ServiceLifetime, ServiceTypeToken};
use crate::service::{Constructible, Service, ServiceDowncast};
#[cfg(test)]
use mockall::automock;
use std::any::TypeId;
use tracing::debug;

/// Boxed registry, frozen for resolution.
pub type ServiceRegistryPtr = Box<dyn ServiceRegistry + Send + Sync>;

/// A registry of service descriptors used when resolving instances. A
/// descriptor matches a request if the requested type equals its service
/// type or its implementation type.
#[cfg_attr(test, automock)]
pub trait ServiceRegistry {
    /// Appends a descriptor. Registration order is significant: it decides
    /// multi-binding order and which binding wins single resolution.
    fn register(&mut self, descriptor: ServiceDescriptor);

    /// Returns the winning descriptor for the given type: the last-registered
    /// match.
    fn descriptor_by_type(&self, type_id: TypeId) -> Option<ServiceDescriptor>;

    /// Returns all matching descriptors, in registration order.
    fn descriptors_by_type(&self, type_id: TypeId) -> Vec<ServiceDescriptor>;

    /// Returns the implementation types of all matching descriptors, in
    /// registration order.
    fn implementation_types(&self, type_id: TypeId) -> Vec<ServiceTypeToken>;

    /// Checks if any descriptor matches the given type.
    fn is_registered(&self, type_id: TypeId) -> bool;
}

/// Typed helpers for [ServiceRegistry] implementations.
pub trait TypedServiceRegistry: ServiceRegistry {
    /// Registers `C` as an implementation of `S` with the given lifetime and
    /// supplied arguments.
    fn register_service<S: ServiceDowncast<C> + ?Sized, C: Constructible>(
        &mut self,
        lifetime: ServiceLifetime,
        arguments: Arguments,
    ) {
        self.register(ServiceDescriptor::new::<S, C>(lifetime, arguments));
    }

    /// Typed version of [ServiceRegistry::is_registered].
    fn is_registered_typed<S: Service + ?Sized>(&self) -> bool {
        self.is_registered(TypeId::of::<S>())
    }

    /// Typed version of [ServiceRegistry::descriptors_by_type].
    fn descriptors_by_type_typed<S: Service + ?Sized>(&self) -> Vec<ServiceDescriptor> {
        self.descriptors_by_type(TypeId::of::<S>())
    }
}

impl<T: ServiceRegistry + ?Sized> TypedServiceRegistry for T {}

/// Insertion-ordered, append-only [ServiceRegistry] with a fluent
/// registration surface. Registration is expected to run single-threaded to
/// completion before the registry is handed to a provider.
#[derive(Clone, Debug, Default)]
pub struct OrderedServiceRegistry {
    descriptors: Vec<ServiceDescriptor>,
}

impl OrderedServiceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a singleton binding of `S` to `C`.
    pub fn with_singleton<S: ServiceDowncast<C> + ?Sized, C: Constructible>(mut self) -> Self {
        self.register_service::<S, C>(ServiceLifetime::Singleton, Arguments::new());
        self
    }

    /// Registers a singleton binding of `S` to `C` with supplied constructor
    /// arguments.
    pub fn with_singleton_args<S: ServiceDowncast<C> + ?Sized, C: Constructible>(
        mut self,
        arguments: Arguments,
    ) -> Self {
        self.register_service::<S, C>(ServiceLifetime::Singleton, arguments);
        self
    }

    /// Registers a transient binding of `S` to `C`.
    pub fn with_transient<S: ServiceDowncast<C> + ?Sized, C: Constructible>(mut self) -> Self {
        self.register_service::<S, C>(ServiceLifetime::Transient, Arguments::new());
        self
    }

    /// Registers a transient binding of `S` to `C` with supplied constructor
    /// arguments.
    pub fn with_transient_args<S: ServiceDowncast<C> + ?Sized, C: Constructible>(
        mut self,
        arguments: Arguments,
    ) -> Self {
        self.register_service::<S, C>(ServiceLifetime::Transient, arguments);
        self
    }

    /// Registers `C` under its own type as a singleton.
    pub fn with_self_singleton<C: Constructible>(self) -> Self {
        self.with_singleton::<C, C>()
    }

    /// Registers `C` under its own type as a singleton with supplied
    /// constructor arguments.
    pub fn with_self_singleton_args<C: Constructible>(self, arguments: Arguments) -> Self {
        self.with_singleton_args::<C, C>(arguments)
    }

    /// Registers `C` under its own type as a transient.
    pub fn with_self_transient<C: Constructible>(self) -> Self {
        self.with_transient::<C, C>()
    }

    /// Registers `C` under its own type as a transient with supplied
    /// constructor arguments.
    pub fn with_self_transient_args<C: Constructible>(self, arguments: Arguments) -> Self {
        self.with_transient_args::<C, C>(arguments)
    }
}

impl ServiceRegistry for OrderedServiceRegistry {
    fn register(&mut self, descriptor: ServiceDescriptor) {
        debug!(
            "registering service '{}' with implementation '{}'",
            descriptor.service_type, descriptor.implementation_type
        );
        self.descriptors.push(descriptor);
    }

    fn descriptor_by_type(&self, type_id: TypeId) -> Option<ServiceDescriptor> {
        self.descriptors
            .iter()
            .rev()
            .find(|descriptor| descriptor.satisfies(type_id))
            .cloned()
    }

    fn descriptors_by_type(&self, type_id: TypeId) -> Vec<ServiceDescriptor> {
        self.descriptors
            .iter()
            .filter(|descriptor| descriptor.satisfies(type_id))
            .cloned()
            .collect()
    }

    fn implementation_types(&self, type_id: TypeId) -> Vec<ServiceTypeToken> {
        self.descriptors
            .iter()
            .filter(|descriptor| descriptor.satisfies(type_id))
            .map(|descriptor| descriptor.implementation_type)
            .collect()
    }

    fn is_registered(&self, type_id: TypeId) -> bool {
        self.descriptors
            .iter()
            .any(|descriptor| descriptor.satisfies(type_id))
    }
}

#[cfg(test)]
mod tests {
    use crate::constructor::ConstructorDefinition;
    use crate::descriptor::ServiceLifetime;
    use crate::registry::{OrderedServiceRegistry, ServiceRegistry, TypedServiceRegistry};
    use crate::service::Constructible;
    use crate::{injectable, service_alias};
    use std::any::TypeId;

    trait TestTrait: Send + Sync {}

    struct FirstImplementation;

    impl TestTrait for FirstImplementation {}

    impl Constructible for FirstImplementation {
        fn constructors() -> Vec<ConstructorDefinition> {
            vec![ConstructorDefinition::new(vec![], |_| Ok(FirstImplementation))]
        }
    }

    struct SecondImplementation;

    impl TestTrait for SecondImplementation {}

    impl Constructible for SecondImplementation {
        fn constructors() -> Vec<ConstructorDefinition> {
            vec![ConstructorDefinition::new(vec![], |_| Ok(SecondImplementation))]
        }
    }

    struct Unregistered;

    impl Constructible for Unregistered {
        fn constructors() -> Vec<ConstructorDefinition> {
            vec![ConstructorDefinition::new(vec![], |_| Ok(Unregistered))]
        }
    }

    injectable!(dyn TestTrait + Send + Sync);
    service_alias!(dyn TestTrait + Send + Sync => FirstImplementation);
    service_alias!(dyn TestTrait + Send + Sync => SecondImplementation);

    fn create_registry() -> OrderedServiceRegistry {
        OrderedServiceRegistry::new()
            .with_singleton::<dyn TestTrait + Send + Sync, FirstImplementation>()
            .with_transient::<dyn TestTrait + Send + Sync, SecondImplementation>()
    }

    #[test]
    fn should_keep_registration_order() {
        let registry = create_registry();
        let descriptors =
            registry.descriptors_by_type(TypeId::of::<dyn TestTrait + Send + Sync>());

        assert_eq!(descriptors.len(), 2);
        assert_eq!(
            descriptors[0].implementation_type.id(),
            TypeId::of::<FirstImplementation>()
        );
        assert_eq!(
            descriptors[1].implementation_type.id(),
            TypeId::of::<SecondImplementation>()
        );
    }

    #[test]
    fn should_prefer_last_registered_descriptor() {
        let registry = create_registry();
        let descriptor = registry
            .descriptor_by_type(TypeId::of::<dyn TestTrait + Send + Sync>())
            .unwrap();

        assert_eq!(
            descriptor.implementation_type.id(),
            TypeId::of::<SecondImplementation>()
        );
        assert_eq!(descriptor.lifetime, ServiceLifetime::Transient);
    }

    #[test]
    fn should_match_implementation_type_requests() {
        let registry = create_registry();
        let descriptor = registry
            .descriptor_by_type(TypeId::of::<FirstImplementation>())
            .unwrap();

        assert_eq!(
            descriptor.service_type.id(),
            TypeId::of::<dyn TestTrait + Send + Sync>()
        );
        assert!(registry.is_registered(TypeId::of::<FirstImplementation>()));
    }

    #[test]
    fn should_report_unregistered_types() {
        let registry = create_registry();

        assert!(!registry.is_registered(TypeId::of::<i32>()));
        assert!(registry.descriptor_by_type(TypeId::of::<i32>()).is_none());
        assert!(registry.descriptors_by_type(TypeId::of::<i32>()).is_empty());
    }

    #[test]
    fn should_list_implementation_types_without_instantiation() {
        let registry = create_registry();
        let types =
            registry.implementation_types(TypeId::of::<dyn TestTrait + Send + Sync>());

        assert_eq!(types.len(), 2);
        assert!(types[0].name().contains("FirstImplementation"));
        assert!(types[1].name().contains("SecondImplementation"));
    }

    #[test]
    fn should_support_typed_introspection() {
        let registry = create_registry();

        assert!(registry.is_registered_typed::<dyn TestTrait + Send + Sync>());
        assert!(registry.is_registered_typed::<FirstImplementation>());
        assert!(!registry.is_registered_typed::<Unregistered>());
        assert_eq!(
            registry
                .descriptors_by_type_typed::<dyn TestTrait + Send + Sync>()
                .len(),
            2
        );
    }

    #[test]
    fn should_register_self_bindings() {
        let registry = OrderedServiceRegistry::new()
            .with_self_singleton::<FirstImplementation>()
            .with_self_transient::<SecondImplementation>();

        let singleton = registry
            .descriptor_by_type(TypeId::of::<FirstImplementation>())
            .unwrap();
        assert_eq!(singleton.lifetime, ServiceLifetime::Singleton);
        assert_eq!(singleton.service_type, singleton.implementation_type);

        let transient = registry
            .descriptor_by_type(TypeId::of::<SecondImplementation>())
            .unwrap();
        assert_eq!(transient.lifetime, ServiceLifetime::Transient);
    }
}
