//! Services are injectable objects constructed by the container, which
//! themselves can depend on other services.
//!
//! A concrete implementation type declares how it can be built by
//! implementing [Constructible] with a table of
//! [ConstructorDefinition](crate::constructor::ConstructorDefinition)s. The
//! abstract types it can be requested as are tied to it via
//! [ServiceDowncast], typically through the
//! [service_alias!](crate::service_alias) macro:
//!
//! ```
//! use wireup::constructor::ConstructorDefinition;
//! use wireup::service::Constructible;
//! use wireup::{injectable, service_alias};
//!
//! trait Audit: Send + Sync {}
//!
//! struct NullAudit;
//!
//! impl Audit for NullAudit {}
//!
//! impl Constructible for NullAudit {
//!     fn constructors() -> Vec<ConstructorDefinition> {
//!         vec![ConstructorDefinition::new(vec![], |_| Ok(NullAudit))]
//!     }
//! }
//!
//! injectable!(dyn Audit + Send + Sync);
//! service_alias!(dyn Audit + Send + Sync => NullAudit);
//! ```

use crate::constructor::ConstructorDefinition;
use crate::instance_provider::{ServiceInstanceAnyPtr, ServiceInstancePtr};
use std::any::Any;

/// Marker trait for types which can be requested from the container -
/// concrete implementation types and the `dyn Trait` types they are
/// registered under. Implemented automatically for every [Constructible]
/// type; for trait objects use the [injectable!](crate::injectable) macro.
pub trait Service: 'static {}

/// A concrete implementation type, together with its constructor table.
///
/// Each entry describes one way of building the type: an ordered parameter
/// type list and a factory closure receiving the resolved values. The
/// resolver picks the best eligible entry based on what is currently
/// registered and supplied - a type exposing both a minimal and a fully
/// wired constructor automatically receives the richer one once its optional
/// collaborators are registered.
pub trait Constructible: Send + Sync + Sized + 'static {
    /// Returns the constructor table for this type. Declaration order
    /// matters: with equally-scored constructors, the first eligible one
    /// wins.
    fn constructors() -> Vec<ConstructorDefinition>;
}

/// Ties a service type to a concrete implementation type, allowing the
/// type-erased instances flowing through the resolver to be cast back to
/// `ServiceInstancePtr<Self>`. Implemented automatically for concrete types;
/// for `dyn Trait` service types use the
/// [service_alias!](crate::service_alias) macro.
pub trait ServiceDowncast<C: Constructible>: Service {
    fn downcast(
        source: ServiceInstanceAnyPtr,
    ) -> Result<ServiceInstancePtr<Self>, ServiceInstanceAnyPtr>;
}

impl<C: Constructible> Service for C {}

impl<C: Constructible> ServiceDowncast<C> for C {
    fn downcast(
        source: ServiceInstanceAnyPtr,
    ) -> Result<ServiceInstancePtr<Self>, ServiceInstanceAnyPtr> {
        source.downcast()
    }
}

/// Monomorphized cast from a type-erased instance of `C` to a boxed
/// `ServiceInstancePtr<S>`, captured as a plain fn pointer in descriptors.
pub(crate) fn service_cast<S: ServiceDowncast<C> + ?Sized, C: Constructible>(
    instance: ServiceInstanceAnyPtr,
) -> Result<Box<dyn Any>, ServiceInstanceAnyPtr> {
    S::downcast(instance).map(|ptr| Box::new(ptr) as Box<dyn Any>)
}
