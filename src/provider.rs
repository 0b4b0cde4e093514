//! Core functionality for creating service instances. The
//! [ServiceProvider] consumes descriptors from a frozen
//! [ServiceRegistry](crate::registry::ServiceRegistry), selects a
//! constructor for the implementation type, resolves its parameters
//! recursively and applies the registered lifetime.

use crate::constructor::{ConstructorDefinition, ResolvedParameters};
use crate::descriptor::{ServiceDescriptor, ServiceLifetime, ServiceTypeToken};
use crate::error::ServiceResolutionError;
use crate::instance_provider::{CastFunction, ServiceInstanceAnyPtr, ServiceInstanceProvider};
use crate::registry::ServiceRegistryPtr;
use fxhash::{FxHashMap, FxHashSet};
use itertools::Itertools;
use std::any::TypeId;
use std::sync::{Mutex, PoisonError};
use tracing::{debug, trace};

/// Resolves live service instances. Registration is frozen once the registry
/// is handed over; resolution can then be invoked from multiple threads. The
/// singleton cache is guarded across the whole check-construct-store
/// sequence, so each singleton is constructed at most once even under
/// concurrent first access.
pub struct ServiceProvider {
    registry: ServiceRegistryPtr,
    singletons: Mutex<SingletonCache>,
    strict_selection: bool,
}

// Keyed by (service type, implementation type) so that multiple singleton
// bindings under one service type each cache their own instance; for a single
// binding this behaves exactly like a service-type key.
type SingletonCache = FxHashMap<(TypeId, TypeId), ServiceInstanceAnyPtr>;

struct ResolutionContext<'a> {
    singletons: &'a mut SingletonCache,
    // service types currently being constructed further up the stack
    constructing: FxHashSet<TypeId>,
}

impl ServiceProvider {
    /// Creates a provider over the given frozen registry.
    pub fn new(registry: ServiceRegistryPtr) -> Self {
        Self {
            registry,
            singletons: Mutex::new(FxHashMap::default()),
            strict_selection: false,
        }
    }

    /// Makes a tie at the winning constructor score fail with
    /// [AmbiguousConstructor](ServiceResolutionError::AmbiguousConstructor)
    /// instead of keeping the first eligible constructor.
    pub fn with_strict_constructor_selection(mut self) -> Self {
        self.strict_selection = true;
        self
    }

    fn resolve_instance(
        &self,
        type_id: TypeId,
        context: &mut ResolutionContext<'_>,
    ) -> Result<(ServiceInstanceAnyPtr, CastFunction), ServiceResolutionError> {
        let descriptor = self.registry.descriptor_by_type(type_id).ok_or(
            ServiceResolutionError::NotRegistered {
                type_id,
                type_name: None,
            },
        )?;

        self.create_instance(&descriptor, context)
            .map(|instance| (instance, descriptor.cast_for(type_id)))
    }

    fn create_instance(
        &self,
        descriptor: &ServiceDescriptor,
        context: &mut ResolutionContext<'_>,
    ) -> Result<ServiceInstanceAnyPtr, ServiceResolutionError> {
        let service_id = descriptor.service_type.id();
        let cache_key = (service_id, descriptor.implementation_type.id());

        if context.constructing.contains(&service_id) {
            return Err(ServiceResolutionError::CyclicDependency(
                descriptor.service_type,
            ));
        }

        if descriptor.lifetime == ServiceLifetime::Singleton {
            if let Some(instance) = context.singletons.get(&cache_key) {
                trace!("reusing cached singleton for '{}'", descriptor.service_type);
                return Ok(instance.clone());
            }
        }

        context.constructing.insert(service_id);
        let instance = self.construct_instance(descriptor, context);
        context.constructing.remove(&service_id);

        let instance = instance?;

        if descriptor.lifetime == ServiceLifetime::Singleton {
            context.singletons.insert(cache_key, instance.clone());
        }

        Ok(instance)
    }

    fn construct_instance(
        &self,
        descriptor: &ServiceDescriptor,
        context: &mut ResolutionContext<'_>,
    ) -> Result<ServiceInstanceAnyPtr, ServiceResolutionError> {
        let constructor = self.select_constructor(descriptor)?;
        debug!(
            "constructing '{}' with {} parameter(s)",
            descriptor.implementation_type,
            constructor.parameters().len()
        );

        let mut pool = descriptor.arguments.pool();
        let mut values = Vec::with_capacity(constructor.parameters().len());

        for parameter in constructor.parameters() {
            let parameter_id = parameter.type_token().id();

            if let Some(argument) = pool.consume(parameter_id) {
                let value = argument.to_boxed().ok_or(
                    ServiceResolutionError::IncompatibleInstance(parameter.type_token()),
                )?;
                values.push(value);
            } else if self.registry.is_registered(parameter_id) {
                let (instance, cast) = self.resolve_instance(parameter_id, context)?;
                let value = cast(instance).map_err(|_| {
                    ServiceResolutionError::IncompatibleInstance(parameter.type_token())
                })?;
                values.push(value);
            } else if let Some(default) = parameter.default_value() {
                values.push(default);
            } else {
                return Err(ServiceResolutionError::UnresolvableParameter {
                    parameter: parameter.type_token(),
                    implementation: descriptor.implementation_type,
                });
            }
        }

        let mut resolved = ResolvedParameters::new(values);
        constructor.invoke(&mut resolved).map_err(|source| {
            ServiceResolutionError::InstantiationFailed {
                implementation: descriptor.implementation_type,
                source,
            }
        })
    }

    /// Picks the constructor to run for a descriptor. A single-entry table
    /// is bound directly, so an unsatisfiable parameter surfaces with
    /// parameter-level detail; larger tables go through greedy scoring.
    fn select_constructor<'d>(
        &self,
        descriptor: &'d ServiceDescriptor,
    ) -> Result<&'d ConstructorDefinition, ServiceResolutionError> {
        if descriptor.constructors.is_empty() {
            return Err(ServiceResolutionError::NotConstructible(
                descriptor.implementation_type,
            ));
        }

        if descriptor.constructors.len() == 1 {
            return Ok(&descriptor.constructors[0]);
        }

        let mut best: Option<(usize, &ConstructorDefinition)> = None;
        let mut tied = false;

        for candidate in &descriptor.constructors {
            let Some(score) = self.constructor_score(candidate, descriptor) else {
                continue;
            };

            match best {
                None => best = Some((score, candidate)),
                Some((best_score, _)) if score > best_score => {
                    best = Some((score, candidate));
                    tied = false;
                }
                Some((best_score, _)) if score == best_score => tied = true,
                Some(_) => {}
            }
        }

        match best {
            None => Err(ServiceResolutionError::NoSuitableConstructor(
                descriptor.implementation_type,
            )),
            Some(_) if tied && self.strict_selection => Err(
                ServiceResolutionError::AmbiguousConstructor(descriptor.implementation_type),
            ),
            Some((_, constructor)) => Ok(constructor),
        }
    }

    /// Scores a candidate against the current registrations and the
    /// descriptor's supplied arguments: one point per parameter satisfied by
    /// an argument or a registered service, none for defaults. `None` means
    /// ineligible. Lookups here are shallow - whether a dependency can
    /// actually be constructed is only discovered during instantiation.
    fn constructor_score(
        &self,
        candidate: &ConstructorDefinition,
        descriptor: &ServiceDescriptor,
    ) -> Option<usize> {
        let mut pool = descriptor.arguments.pool();
        let mut score = 0;

        for parameter in candidate.parameters() {
            let parameter_id = parameter.type_token().id();

            if pool.consume(parameter_id).is_some() || self.registry.is_registered(parameter_id) {
                score += 1;
            } else if !parameter.has_default() {
                return None;
            }
        }

        Some(score)
    }
}

impl ServiceInstanceProvider for ServiceProvider {
    fn instance(
        &self,
        type_id: TypeId,
    ) -> Result<(ServiceInstanceAnyPtr, CastFunction), ServiceResolutionError> {
        trace!("resolving service instance for {:?}", type_id);

        let mut singletons = self
            .singletons
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let mut context = ResolutionContext {
            singletons: &mut singletons,
            constructing: FxHashSet::default(),
        };

        self.resolve_instance(type_id, &mut context)
    }

    fn instances(
        &self,
        type_id: TypeId,
    ) -> Result<Vec<(ServiceInstanceAnyPtr, CastFunction)>, ServiceResolutionError> {
        let mut singletons = self
            .singletons
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let mut context = ResolutionContext {
            singletons: &mut singletons,
            constructing: FxHashSet::default(),
        };

        self.registry
            .descriptors_by_type(type_id)
            .iter()
            .map(|descriptor| {
                self.create_instance(descriptor, &mut context)
                    .map(|instance| (instance, descriptor.cast_for(type_id)))
            })
            .try_collect()
    }

    fn instance_types(&self, type_id: TypeId) -> Vec<ServiceTypeToken> {
        self.registry.implementation_types(type_id)
    }
}
