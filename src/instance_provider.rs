//! Type-erased plumbing for moving service instances between the resolver
//! and typed callers. Instances travel as [ServiceInstanceAnyPtr]s paired
//! with a [CastFunction] captured at registration time, which converts them
//! back to concrete pointers at the typed boundary.

use crate::descriptor::ServiceTypeToken;
use crate::error::ServiceResolutionError;
use crate::service::Service;
use itertools::Itertools;
use std::any::{type_name, Any, TypeId};
use std::error::Error;
use std::sync::Arc;

/// Shared pointer to a service instance.
pub type ServiceInstancePtr<T> = Arc<T>;

/// Type-erased [ServiceInstancePtr].
pub type ServiceInstanceAnyPtr = ServiceInstancePtr<dyn Any + Send + Sync + 'static>;

/// Errors returned from user constructor code.
pub type ErrorPtr = Arc<dyn Error + Send + Sync>;

/// Casts a type-erased instance to a `Box<dyn Any>` containing a
/// [ServiceInstancePtr] to a concrete service type. On mismatch, the original
/// instance is given back in the error variant.
pub type CastFunction = fn(ServiceInstanceAnyPtr) -> Result<Box<dyn Any>, ServiceInstanceAnyPtr>;

/// Generic provider for service instances.
pub trait ServiceInstanceProvider {
    /// Resolves a single instance of the given type, along with the cast
    /// function registered for it. With multiple registrations present, the
    /// last-registered one wins.
    fn instance(
        &self,
        type_id: TypeId,
    ) -> Result<(ServiceInstanceAnyPtr, CastFunction), ServiceResolutionError>;

    /// Resolves all instances registered under the given type, in
    /// registration order.
    fn instances(
        &self,
        type_id: TypeId,
    ) -> Result<Vec<(ServiceInstanceAnyPtr, CastFunction)>, ServiceResolutionError>;

    /// Returns the implementation types registered under the given type,
    /// without instantiating anything.
    fn instance_types(&self, type_id: TypeId) -> Vec<ServiceTypeToken>;
}

/// Helper trait for [ServiceInstanceProvider] providing strongly-typed
/// access.
pub trait TypedServiceInstanceProvider {
    /// Typesafe version of [ServiceInstanceProvider::instance].
    fn get_service<S: Service + ?Sized>(
        &self,
    ) -> Result<ServiceInstancePtr<S>, ServiceResolutionError>;

    /// Tries to get an instance like
    /// [get_service](TypedServiceInstanceProvider::get_service) does, but
    /// returns `None` when the type is not registered.
    fn get_service_option<S: Service + ?Sized>(
        &self,
    ) -> Result<Option<ServiceInstancePtr<S>>, ServiceResolutionError>;

    /// Typesafe version of [ServiceInstanceProvider::instances].
    fn get_services<S: Service + ?Sized>(
        &self,
    ) -> Result<Vec<ServiceInstancePtr<S>>, ServiceResolutionError>;

    /// Typesafe version of [ServiceInstanceProvider::instance_types].
    fn get_service_types<S: Service + ?Sized>(&self) -> Vec<ServiceTypeToken>;
}

impl<P: ServiceInstanceProvider + ?Sized> TypedServiceInstanceProvider for P {
    fn get_service<S: Service + ?Sized>(
        &self,
    ) -> Result<ServiceInstancePtr<S>, ServiceResolutionError> {
        self.instance(TypeId::of::<S>())
            .map_err(|error| error.with_type_name(type_name::<S>()))
            .and_then(|(instance, cast)| cast_instance::<S>(instance, cast))
    }

    fn get_service_option<S: Service + ?Sized>(
        &self,
    ) -> Result<Option<ServiceInstancePtr<S>>, ServiceResolutionError> {
        match self.get_service::<S>() {
            Ok(instance) => Ok(Some(instance)),
            Err(ServiceResolutionError::NotRegistered { .. }) => Ok(None),
            Err(error) => Err(error),
        }
    }

    fn get_services<S: Service + ?Sized>(
        &self,
    ) -> Result<Vec<ServiceInstancePtr<S>>, ServiceResolutionError> {
        self.instances(TypeId::of::<S>())?
            .into_iter()
            .map(|(instance, cast)| cast_instance::<S>(instance, cast))
            .try_collect()
    }

    fn get_service_types<S: Service + ?Sized>(&self) -> Vec<ServiceTypeToken> {
        self.instance_types(TypeId::of::<S>())
    }
}

fn cast_instance<S: ?Sized + 'static>(
    instance: ServiceInstanceAnyPtr,
    cast: CastFunction,
) -> Result<ServiceInstancePtr<S>, ServiceResolutionError> {
    cast(instance)
        .map_err(|_| ServiceResolutionError::IncompatibleInstance(ServiceTypeToken::of::<S>()))
        .and_then(|boxed| {
            boxed
                .downcast::<ServiceInstancePtr<S>>()
                .map(|ptr| *ptr)
                .map_err(|_| {
                    ServiceResolutionError::IncompatibleInstance(ServiceTypeToken::of::<S>())
                })
        })
}
