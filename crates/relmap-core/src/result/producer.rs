use crate::{
    collection::{CollectionRole, PersistentListDescriptor},
    error::InternalError,
    model::NavigablePath,
    obs::MetricsEvent,
    result::{CollectionInitializer, CollectionKey, DomainResult, ListInitializer},
    traits::{ElementValue, OwnerKind},
};

///
/// LockMode
/// Row lock requested by the query that fetches the collection.
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum LockMode {
    #[default]
    None,
    Read,
    Optimistic,
    PessimisticRead,
    PessimisticWrite,
}

///
/// FetchParent
/// The result node a collection fetch hangs off.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FetchParent {
    path: NavigablePath,
}

impl FetchParent {
    #[must_use]
    pub const fn new(path: NavigablePath) -> Self {
        Self { path }
    }

    #[must_use]
    pub const fn path(&self) -> &NavigablePath {
        &self.path
    }
}

///
/// CollectionInitializerProducer
///
/// Per-query factory for the objects that materialize one collection
/// from result rows.
///

pub trait CollectionInitializerProducer<E> {
    type Initializer: CollectionInitializer<E>;

    /// A fresh initializer for the collection identified by `key`.
    fn produce_initializer(&self, key: CollectionKey) -> Result<Self::Initializer, InternalError>;
}

///
/// ListInitializerProducer
///
/// Binds a list descriptor to one query's row shape. Holds exactly one
/// index result and one element result, built for this producer only.
///

#[derive(Debug)]
pub struct ListInitializerProducer<'d, O, E> {
    descriptor: &'d PersistentListDescriptor<O, E>,
    fetch_parent: FetchParent,
    selected: bool,
    result_alias: Option<String>,
    lock_mode: LockMode,
    index_result: DomainResult,
    element_result: DomainResult,
}

impl<'d, O, E> ListInitializerProducer<'d, O, E>
where
    O: OwnerKind,
    E: ElementValue,
{
    pub(crate) const fn new(
        descriptor: &'d PersistentListDescriptor<O, E>,
        fetch_parent: FetchParent,
        selected: bool,
        result_alias: Option<String>,
        lock_mode: LockMode,
        index_result: DomainResult,
        element_result: DomainResult,
    ) -> Self {
        Self {
            descriptor,
            fetch_parent,
            selected,
            result_alias,
            lock_mode,
            index_result,
            element_result,
        }
    }

    #[must_use]
    pub const fn descriptor(&self) -> &'d PersistentListDescriptor<O, E> {
        self.descriptor
    }

    #[must_use]
    pub fn role(&self) -> &CollectionRole {
        self.descriptor.role()
    }

    #[must_use]
    pub const fn fetch_parent(&self) -> &FetchParent {
        &self.fetch_parent
    }

    /// Whether this occurrence is the selected result rather than a fetch.
    #[must_use]
    pub const fn is_selected(&self) -> bool {
        self.selected
    }

    #[must_use]
    pub fn result_alias(&self) -> Option<&str> {
        self.result_alias.as_deref()
    }

    #[must_use]
    pub const fn lock_mode(&self) -> LockMode {
        self.lock_mode
    }

    #[must_use]
    pub const fn index_result(&self) -> &DomainResult {
        &self.index_result
    }

    #[must_use]
    pub const fn element_result(&self) -> &DomainResult {
        &self.element_result
    }
}

impl<'d, O, E> CollectionInitializerProducer<E> for ListInitializerProducer<'d, O, E>
where
    O: OwnerKind,
    E: ElementValue,
{
    type Initializer = ListInitializer<'d, O, E>;

    fn produce_initializer(&self, key: CollectionKey) -> Result<Self::Initializer, InternalError> {
        if key.role() != self.descriptor.role() {
            return Err(InternalError::result_invariant(format!(
                "initializer for '{}' requested from producer of '{}'",
                key.role(),
                self.descriptor.role()
            )));
        }

        self.descriptor.record(MetricsEvent::InitializerCreated {
            role: self.descriptor.role().as_str(),
        });

        Ok(ListInitializer::new(
            self.descriptor,
            key,
            self.index_result.selection().clone(),
            self.element_result.selection().clone(),
        ))
    }
}
