//! Persistent collection descriptors and runtime collection instances.
//!
//! A descriptor is built once per (owner type, attribute) from the boot
//! mapping and is immutable afterwards. Runtime instances are owned by
//! entity instances; descriptors only ever borrow them.

mod attribute;
mod instance;
mod list;
mod position;
mod queued;

pub use attribute::{FieldAccess, ListAttribute, PluralAttribute, PropertyAccess};
pub use instance::{Element, EntityProxy, PersistentBag, PersistentCollection, PersistentList};
pub use list::PersistentListDescriptor;
pub use position::{CollectionElement, CollectionIndex, ElementNature};
pub use queued::{QueuedListOp, QueuedOpError, apply_queued};

use crate::{
    error::InternalError,
    model::{CollectionClassification, NavigablePath},
    result::{CollectionInitializerProducer, DomainResultCreationState, FetchParent, LockMode},
    session::SharedSessionContract,
    value::Value,
};
use derive_more::Display;

///
/// CollectionRole
/// `Owner.attribute` name of a collection mapping.
///

#[derive(Clone, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct CollectionRole(String);

impl CollectionRole {
    #[must_use]
    pub fn new(owner: &str, attribute: &str) -> Self {
        Self(format!("{owner}.{attribute}"))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

///
/// PersistentCollectionDescriptor
///
/// Mapping and behavior of one collection-valued attribute across every
/// instance of its owner type. Implementations are immutable after
/// construction and shared between sessions without locking.
///

pub trait PersistentCollectionDescriptor<O, E>: Send + Sync {
    type Producer<'a>: CollectionInitializerProducer<E>
    where
        Self: 'a;

    fn role(&self) -> &CollectionRole;

    fn classification(&self) -> CollectionClassification;

    fn element_descriptor(&self) -> &CollectionElement;

    /// `None` for shapes without a positional index.
    fn index_descriptor(&self) -> Option<&CollectionIndex>;

    fn has_index(&self) -> bool {
        self.index_descriptor().is_some()
    }

    /// Whether the index is computed by a formula. Meaningful only when
    /// [`has_index`](Self::has_index) is true.
    fn index_contains_formula(&self) -> bool;

    /// Membership test against a loaded collection instance.
    fn contains(
        &self,
        collection: &PersistentCollection<E>,
        candidate: &Element<E>,
    ) -> Result<bool, InternalError>;

    /// First position holding the same element handle, by identity.
    fn index_of(
        &self,
        collection: &PersistentCollection<E>,
        element: &Element<E>,
    ) -> Result<Option<usize>, InternalError>;

    /// Handle operations queued while the collection was uninitialized.
    /// Returns the number of operations applied.
    fn process_queued_ops(
        &self,
        collection: &mut PersistentCollection<E>,
        owner_id: &Value,
        session: &dyn SharedSessionContract,
    ) -> Result<usize, InternalError>;

    /// Build the index and element domain results for one query and bind
    /// them to a new producer. Every call builds fresh results.
    fn create_initializer_producer<'a>(
        &'a self,
        path: &NavigablePath,
        fetch_parent: &FetchParent,
        selected: bool,
        result_alias: Option<&str>,
        lock_mode: LockMode,
        creation_state: &mut dyn DomainResultCreationState,
    ) -> Result<Self::Producer<'a>, InternalError>;
}
