//! Declarative helpers for wiring `dyn Trait` service types to their
//! implementations.

/// Marks a `dyn Trait` type as a service type which can be requested from
/// the container.
///
/// ```
/// trait Audit: Send + Sync {}
///
/// wireup::injectable!(dyn Audit + Send + Sync);
/// ```
#[macro_export]
macro_rules! injectable {
    ($service:ty) => {
        impl $crate::service::Service for $service {}
    };
}

/// Makes a concrete implementation type downcast-compatible with a
/// `dyn Trait` service type, enabling `with_singleton::<dyn Trait, Impl>()`
/// style bindings. The trait type must already be marked with
/// [injectable!](crate::injectable).
#[macro_export]
macro_rules! service_alias {
    ($service:ty => $implementation:ty) => {
        impl $crate::service::ServiceDowncast<$implementation> for $service {
            fn downcast(
                source: $crate::instance_provider::ServiceInstanceAnyPtr,
            ) -> ::core::result::Result<
                $crate::instance_provider::ServiceInstancePtr<Self>,
                $crate::instance_provider::ServiceInstanceAnyPtr,
            > {
                source
                    .downcast::<$implementation>()
                    .map(|ptr| ptr as $crate::instance_provider::ServiceInstancePtr<Self>)
            }
        }
    };
}
