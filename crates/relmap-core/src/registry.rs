use crate::{
    collection::{CollectionRole, PersistentListDescriptor},
    error::{ErrorClass, ErrorOrigin, InternalError, TypeMismatchError},
    model::RuntimeModelCreationContext,
    obs::TraceEvent,
    traits::{ElementValue, OwnerKind},
};
use std::{any::Any, collections::BTreeMap, sync::Arc};
use thiserror::Error as ThisError;

type SharedDescriptor = Arc<dyn Any + Send + Sync>;

///
/// DescriptorRegistryError
///

#[derive(Debug, ThisError)]
pub enum DescriptorRegistryError {
    #[error("collection descriptor '{0}' not found")]
    DescriptorNotFound(String),

    #[error("collection descriptor '{0}' already registered")]
    DescriptorAlreadyRegistered(String),
}

impl DescriptorRegistryError {
    pub(crate) const fn class(&self) -> ErrorClass {
        match self {
            Self::DescriptorNotFound(_) => ErrorClass::Internal,
            Self::DescriptorAlreadyRegistered(_) => ErrorClass::InvariantViolation,
        }
    }
}

impl From<DescriptorRegistryError> for InternalError {
    fn from(err: DescriptorRegistryError) -> Self {
        Self::new(err.class(), ErrorOrigin::Registry, err.to_string())
    }
}

///
/// DescriptorRegistryBuilder
///
/// Collects descriptors while the mapping model is built. Frozen into a
/// [`DescriptorRegistry`] once every mapping has been read.
///

#[derive(Default)]
pub struct DescriptorRegistryBuilder {
    context: RuntimeModelCreationContext,
    descriptors: BTreeMap<CollectionRole, SharedDescriptor>,
}

impl DescriptorRegistryBuilder {
    #[must_use]
    pub fn new(context: &RuntimeModelCreationContext) -> Self {
        Self {
            context: context.clone(),
            descriptors: BTreeMap::new(),
        }
    }

    /// Register a list descriptor under its role.
    pub fn register<O, E>(
        &mut self,
        descriptor: Arc<PersistentListDescriptor<O, E>>,
    ) -> Result<(), InternalError>
    where
        O: OwnerKind,
        E: ElementValue,
    {
        let role = descriptor.role().clone();
        if self.descriptors.contains_key(&role) {
            return Err(
                DescriptorRegistryError::DescriptorAlreadyRegistered(role.to_string()).into(),
            );
        }

        self.context.trace(TraceEvent::DescriptorRegistered {
            role: role.to_string(),
        });
        self.descriptors.insert(role, descriptor);

        Ok(())
    }

    #[must_use]
    pub fn build(self) -> DescriptorRegistry {
        DescriptorRegistry {
            descriptors: self.descriptors,
        }
    }
}

///
/// DescriptorRegistry
///
/// Frozen descriptor store keyed by collection role. Never mutated after
/// `build`, so it is shared between threads without locking.
///

#[derive(Default)]
pub struct DescriptorRegistry {
    descriptors: BTreeMap<CollectionRole, SharedDescriptor>,
}

impl DescriptorRegistry {
    #[must_use]
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    #[must_use]
    pub fn contains(&self, role: &CollectionRole) -> bool {
        self.descriptors.contains_key(role)
    }

    /// Registered roles in order.
    pub fn roles(&self) -> impl Iterator<Item = &CollectionRole> {
        self.descriptors.keys()
    }

    /// Typed lookup. Asking for the wrong owner or element type is a type
    /// mismatch, not a missing descriptor.
    pub fn list_descriptor<O, E>(
        &self,
        role: &CollectionRole,
    ) -> Result<Arc<PersistentListDescriptor<O, E>>, InternalError>
    where
        O: OwnerKind,
        E: ElementValue,
    {
        let shared = self
            .descriptors
            .get(role)
            .ok_or_else(|| DescriptorRegistryError::DescriptorNotFound(role.to_string()))?;

        Arc::clone(shared)
            .downcast::<PersistentListDescriptor<O, E>>()
            .map_err(|_| {
                InternalError::type_mismatch(
                    ErrorOrigin::Registry,
                    TypeMismatchError::DescriptorTypes {
                        role: role.to_string(),
                    },
                )
            })
    }
}

impl std::fmt::Debug for DescriptorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.descriptors.keys()).finish()
    }
}

///
/// TESTS
///
