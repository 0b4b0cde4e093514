//! Constructor tables. Each [Constructible](crate::service::Constructible)
//! implementation declares the constructors the resolver can pick from: an
//! ordered parameter type list plus a factory closure receiving the resolved
//! values.

use crate::descriptor::ServiceTypeToken;
use crate::instance_provider::{ErrorPtr, ServiceInstanceAnyPtr, ServiceInstancePtr};
use crate::service::Constructible;
use derivative::Derivative;
use std::any::{type_name, Any};
use std::collections::VecDeque;
use std::sync::Arc;
use thiserror::Error;

type DefaultFunction = Arc<dyn Fn() -> Box<dyn Any> + Send + Sync>;
type ConstructFunction =
    Arc<dyn Fn(&mut ResolvedParameters) -> Result<ServiceInstanceAnyPtr, ErrorPtr> + Send + Sync>;

/// A single constructor parameter: the type to resolve and, optionally, a
/// default value used when the type is neither supplied nor registered.
#[derive(Derivative, Clone)]
#[derivative(Debug)]
pub struct Parameter {
    type_token: ServiceTypeToken,
    #[derivative(Debug = "ignore")]
    default: Option<DefaultFunction>,
}

impl Parameter {
    /// A parameter which must be satisfied by a supplied argument or a
    /// registered service.
    pub fn required<S: ?Sized + 'static>() -> Self {
        Self {
            type_token: ServiceTypeToken::of::<S>(),
            default: None,
        }
    }

    /// A parameter falling back to the given default value when its type is
    /// neither supplied as an argument nor registered.
    pub fn with_default<S: ?Sized + 'static>(
        default: impl Fn() -> ServiceInstancePtr<S> + Send + Sync + 'static,
    ) -> Self {
        Self {
            type_token: ServiceTypeToken::of::<S>(),
            default: Some(Arc::new(move || Box::new(default()) as Box<dyn Any>)),
        }
    }

    pub fn type_token(&self) -> ServiceTypeToken {
        self.type_token
    }

    pub(crate) fn has_default(&self) -> bool {
        self.default.is_some()
    }

    pub(crate) fn default_value(&self) -> Option<Box<dyn Any>> {
        self.default.as_ref().map(|default| default())
    }
}

/// Mismatch between a constructor's declared parameter list and the values
/// its factory closure tried to take.
#[derive(Error, Clone, Debug)]
#[error("constructor parameter mismatch: no resolved value of type '{expected}' left to take")]
pub struct ParameterMismatch {
    expected: &'static str,
}

/// The values resolved for a constructor's parameters, in declaration order.
pub struct ResolvedParameters {
    values: VecDeque<Box<dyn Any>>,
}

impl ResolvedParameters {
    pub(crate) fn new(values: Vec<Box<dyn Any>>) -> Self {
        Self {
            values: values.into(),
        }
    }

    /// Takes the next resolved value, downcast to a pointer to the declared
    /// parameter type. Values must be taken in parameter declaration order.
    pub fn take<S: ?Sized + 'static>(&mut self) -> Result<ServiceInstancePtr<S>, ErrorPtr> {
        self.values
            .pop_front()
            .and_then(|value| value.downcast::<ServiceInstancePtr<S>>().ok())
            .map(|ptr| *ptr)
            .ok_or_else(|| {
                Arc::new(ParameterMismatch {
                    expected: type_name::<S>(),
                }) as ErrorPtr
            })
    }
}

/// One way of constructing an implementation type.
#[derive(Derivative, Clone)]
#[derivative(Debug)]
pub struct ConstructorDefinition {
    parameters: Vec<Parameter>,
    #[derivative(Debug = "ignore")]
    construct: ConstructFunction,
}

impl ConstructorDefinition {
    /// Creates a constructor definition for implementation type `C`. The
    /// factory receives the values resolved for `parameters` and takes them
    /// out, in order, with [ResolvedParameters::take].
    pub fn new<C, F>(parameters: Vec<Parameter>, construct: F) -> Self
    where
        C: Constructible,
        F: Fn(&mut ResolvedParameters) -> Result<C, ErrorPtr> + Send + Sync + 'static,
    {
        Self {
            parameters,
            construct: Arc::new(move |values| {
                construct(values)
                    .map(|instance| ServiceInstancePtr::new(instance) as ServiceInstanceAnyPtr)
            }),
        }
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    pub(crate) fn invoke(
        &self,
        values: &mut ResolvedParameters,
    ) -> Result<ServiceInstanceAnyPtr, ErrorPtr> {
        (self.construct)(values)
    }
}
