//! Data model for service registrations. Descriptors are created at
//! registration time, are immutable afterwards, and live as long as the
//! container.

use crate::constructor::ConstructorDefinition;
use crate::instance_provider::{CastFunction, ServiceInstanceAnyPtr, ServiceInstancePtr};
use crate::service::{service_cast, Constructible, ServiceDowncast};
use derivative::Derivative;
use std::any::{type_name, Any, TypeId};
use std::fmt::{Display, Formatter};

/// Determines whether the container shares one instance of a service or
/// constructs a fresh one per request.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ServiceLifetime {
    /// One instance, constructed lazily on first request and shared for the
    /// life of the container.
    Singleton,
    /// A new instance per resolution request.
    Transient,
}

/// Identifies a type at runtime: its [TypeId] plus a human-readable name for
/// diagnostics.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct ServiceTypeToken {
    id: TypeId,
    name: &'static str,
}

impl ServiceTypeToken {
    pub fn of<S: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<S>(),
            name: type_name::<S>(),
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl Display for ServiceTypeToken {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name)
    }
}

/// Ordered values supplied at registration time, matched to constructor
/// parameters by exact type. Each value is consumed by at most one parameter
/// per construction, so two parameters of the same type draw distinct values
/// in supply order.
#[derive(Derivative, Clone, Default)]
#[derivative(Debug)]
pub struct Arguments {
    values: Vec<SuppliedArgument>,
}

impl Arguments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a value to the argument list.
    pub fn with<V: Send + Sync + 'static>(mut self, value: V) -> Self {
        self.values.push(SuppliedArgument {
            type_token: ServiceTypeToken::of::<V>(),
            value: ServiceInstancePtr::new(value) as ServiceInstanceAnyPtr,
            cast: argument_cast::<V>,
        });
        self
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub(crate) fn pool(&self) -> ArgumentPool<'_> {
        ArgumentPool {
            remaining: self.values.iter().collect(),
        }
    }
}

#[derive(Derivative, Clone)]
#[derivative(Debug)]
pub(crate) struct SuppliedArgument {
    type_token: ServiceTypeToken,
    #[derivative(Debug = "ignore")]
    value: ServiceInstanceAnyPtr,
    #[derivative(Debug = "ignore")]
    cast: CastFunction,
}

impl SuppliedArgument {
    /// The supplied value as a boxed [ServiceInstancePtr] to its exact type.
    pub(crate) fn to_boxed(&self) -> Option<Box<dyn Any>> {
        (self.cast)(self.value.clone()).ok()
    }
}

/// Pool of not-yet-consumed supplied arguments, replenished for every
/// construction.
pub(crate) struct ArgumentPool<'a> {
    remaining: Vec<&'a SuppliedArgument>,
}

impl<'a> ArgumentPool<'a> {
    /// Removes and returns the first remaining argument of the given exact
    /// type.
    pub(crate) fn consume(&mut self, type_id: TypeId) -> Option<&'a SuppliedArgument> {
        let position = self
            .remaining
            .iter()
            .position(|argument| argument.type_token.id() == type_id)?;
        Some(self.remaining.remove(position))
    }
}

/// One service registration: binds a service type to an implementation type,
/// a lifetime and optional supplied arguments, together with the constructor
/// table and cast functions captured from the implementation at registration
/// time.
#[derive(Derivative, Clone)]
#[derivative(Debug)]
pub struct ServiceDescriptor {
    pub service_type: ServiceTypeToken,
    pub implementation_type: ServiceTypeToken,
    pub lifetime: ServiceLifetime,
    pub arguments: Arguments,
    #[derivative(Debug = "ignore")]
    pub constructors: Vec<ConstructorDefinition>,
    #[derivative(Debug = "ignore")]
    pub service_cast: CastFunction,
    #[derivative(Debug = "ignore")]
    pub implementation_cast: CastFunction,
}

impl ServiceDescriptor {
    /// Creates a descriptor binding the service type `S` to the concrete
    /// implementation `C`. The `S: ServiceDowncast<C>` bound is what
    /// guarantees, at compile time, that `C` satisfies the capability set of
    /// `S`.
    pub fn new<S: ServiceDowncast<C> + ?Sized, C: Constructible>(
        lifetime: ServiceLifetime,
        arguments: Arguments,
    ) -> Self {
        Self {
            service_type: ServiceTypeToken::of::<S>(),
            implementation_type: ServiceTypeToken::of::<C>(),
            lifetime,
            arguments,
            constructors: C::constructors(),
            service_cast: service_cast::<S, C>,
            implementation_cast: service_cast::<C, C>,
        }
    }

    /// Checks whether this descriptor can satisfy a request for the given
    /// type, either as the registered service type or as the concrete
    /// implementation type.
    pub fn satisfies(&self, type_id: TypeId) -> bool {
        self.service_type.id() == type_id || self.implementation_type.id() == type_id
    }

    /// The cast function appropriate for a request matched by
    /// [satisfies](Self::satisfies).
    pub fn cast_for(&self, type_id: TypeId) -> CastFunction {
        if self.service_type.id() == type_id {
            self.service_cast
        } else {
            self.implementation_cast
        }
    }
}

fn argument_cast<V: Send + Sync + 'static>(
    instance: ServiceInstanceAnyPtr,
) -> Result<Box<dyn Any>, ServiceInstanceAnyPtr> {
    instance.downcast::<V>().map(|ptr| Box::new(ptr) as Box<dyn Any>)
}

#[cfg(test)]
mod tests {
    use crate::constructor::ConstructorDefinition;
    use crate::descriptor::{Arguments, ServiceDescriptor, ServiceLifetime, ServiceTypeToken};
    use crate::instance_provider::ServiceInstancePtr;
    use crate::service::Constructible;
    use std::any::TypeId;

    struct TestService;

    impl Constructible for TestService {
        fn constructors() -> Vec<ConstructorDefinition> {
            vec![ConstructorDefinition::new(vec![], |_| Ok(TestService))]
        }
    }

    fn take_value<V: Send + Sync + 'static>(
        argument: &crate::descriptor::SuppliedArgument,
    ) -> ServiceInstancePtr<V> {
        *argument
            .to_boxed()
            .unwrap()
            .downcast::<ServiceInstancePtr<V>>()
            .unwrap()
    }

    #[test]
    fn should_consume_arguments_in_supply_order() {
        let arguments = Arguments::new().with(1i32).with(2i32);
        let mut pool = arguments.pool();

        let first = pool.consume(TypeId::of::<i32>()).unwrap();
        let second = pool.consume(TypeId::of::<i32>()).unwrap();

        assert_eq!(*take_value::<i32>(first), 1);
        assert_eq!(*take_value::<i32>(second), 2);
        assert!(pool.consume(TypeId::of::<i32>()).is_none());
    }

    #[test]
    fn should_consume_arguments_by_exact_type() {
        let arguments = Arguments::new().with(1i32).with("label".to_string());
        let mut pool = arguments.pool();

        let label = pool.consume(TypeId::of::<String>()).unwrap();
        assert_eq!(*take_value::<String>(label), "label");

        let number = pool.consume(TypeId::of::<i32>()).unwrap();
        assert_eq!(*take_value::<i32>(number), 1);

        assert!(pool.consume(TypeId::of::<u8>()).is_none());
    }

    #[test]
    fn should_replenish_pool_per_construction() {
        let arguments = Arguments::new().with(1i32);

        let mut first_pool = arguments.pool();
        assert!(first_pool.consume(TypeId::of::<i32>()).is_some());

        let mut second_pool = arguments.pool();
        assert!(second_pool.consume(TypeId::of::<i32>()).is_some());
    }

    #[test]
    fn should_match_service_and_implementation_type() {
        let descriptor =
            ServiceDescriptor::new::<TestService, TestService>(ServiceLifetime::Transient, Arguments::new());

        assert!(descriptor.satisfies(TypeId::of::<TestService>()));
        assert!(!descriptor.satisfies(TypeId::of::<i32>()));
        assert_eq!(descriptor.lifetime, ServiceLifetime::Transient);
        assert_eq!(descriptor.service_type, descriptor.implementation_type);
    }

    #[test]
    fn should_expose_type_token_metadata() {
        let token = ServiceTypeToken::of::<TestService>();

        assert_eq!(token, ServiceTypeToken::of::<TestService>());
        assert_eq!(token.id(), TypeId::of::<TestService>());
        assert!(token.name().contains("TestService"));
        assert_eq!(token.to_string(), token.name());
    }
}
