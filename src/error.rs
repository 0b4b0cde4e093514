use crate::descriptor::ServiceTypeToken;
use crate::instance_provider::ErrorPtr;
use std::any::TypeId;
use thiserror::Error;

/// Errors surfaced when resolving service instances. All variants are
/// terminal - nothing is retried internally and no partial results are
/// returned.
#[derive(Error, Clone, Debug)]
pub enum ServiceResolutionError {
    /// The requested type has no descriptor in the registry.
    #[error("no service descriptor registered for type {type_id:?} ({type_name:?})")]
    NotRegistered {
        type_id: TypeId,
        type_name: Option<&'static str>,
    },
    /// The implementation type declares an empty constructor table.
    #[error("implementation type '{0}' declares no constructors")]
    NotConstructible(ServiceTypeToken),
    /// No declared constructor has all of its parameters satisfiable.
    #[error("no eligible constructor found for implementation type '{0}'")]
    NoSuitableConstructor(ServiceTypeToken),
    /// Multiple constructors scored equally well and strict selection was
    /// requested.
    #[error("multiple constructors of '{0}' are equally suitable and none was disambiguated")]
    AmbiguousConstructor(ServiceTypeToken),
    /// A parameter matched no supplied argument, registered service, or
    /// default value.
    #[error("cannot resolve parameter '{parameter}' of implementation type '{implementation}'")]
    UnresolvableParameter {
        parameter: ServiceTypeToken,
        implementation: ServiceTypeToken,
    },
    /// The selected constructor ran, but returned an error.
    #[error("constructing '{implementation}' failed")]
    InstantiationFailed {
        implementation: ServiceTypeToken,
        #[source]
        source: ErrorPtr,
    },
    /// The requested service is already being constructed further up the
    /// resolution stack.
    #[error("dependency cycle detected while constructing '{0}'")]
    CyclicDependency(ServiceTypeToken),
    /// A resolved instance could not be cast back to the requested type.
    #[error("tried to downcast service instance to incompatible type '{0}'")]
    IncompatibleInstance(ServiceTypeToken),
}

impl ServiceResolutionError {
    pub(crate) fn with_type_name(self, name: &'static str) -> Self {
        match self {
            Self::NotRegistered {
                type_id,
                type_name: None,
            } => Self::NotRegistered {
                type_id,
                type_name: Some(name),
            },
            other => other,
        }
    }
}
