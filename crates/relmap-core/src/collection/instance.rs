use crate::{
    collection::queued::{QueuedListOp, QueuedOpError, apply_queued},
    value::Value,
};
use std::sync::{Arc, OnceLock};

///
/// Element
///
/// Handle to one collection slot. Handles compare by identity: two
/// `Instance` handles are the same element only when they share the same
/// allocation, never because their contents compare equal.
///

#[derive(Debug)]
pub enum Element<E> {
    Null,
    Instance(Arc<E>),
    Proxy(Arc<EntityProxy<E>>),
}

impl<E> Element<E> {
    #[must_use]
    pub fn new(value: E) -> Self {
        Self::Instance(Arc::new(value))
    }

    /// An unresolved stand-in for the entity with identifier `id`.
    #[must_use]
    pub fn proxy(id: Value) -> Self {
        Self::Proxy(Arc::new(EntityProxy::new(id)))
    }

    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Identity comparison used by position scans and list membership.
    ///
    /// Proxies are not unwrapped: a proxy and the instance it resolves to
    /// are different identities.
    #[must_use]
    pub fn same_identity(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Instance(a), Self::Instance(b)) => Arc::ptr_eq(a, b),
            (Self::Proxy(a), Self::Proxy(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// The element value, if loaded. A proxy yields its target once resolved.
    #[must_use]
    pub fn get(&self) -> Option<&E> {
        match self {
            Self::Null => None,
            Self::Instance(value) => Some(&**value),
            Self::Proxy(proxy) => proxy.target().map(|target| &**target),
        }
    }
}

impl<E> Clone for Element<E> {
    fn clone(&self) -> Self {
        match self {
            Self::Null => Self::Null,
            Self::Instance(value) => Self::Instance(Arc::clone(value)),
            Self::Proxy(proxy) => Self::Proxy(Arc::clone(proxy)),
        }
    }
}

///
/// EntityProxy
///
/// Lazy stand-in for an associated entity known only by identifier.
/// Resolution is performed by the session layer and happens at most once.
///

#[derive(Debug)]
pub struct EntityProxy<E> {
    id: Value,
    target: OnceLock<Arc<E>>,
}

impl<E> EntityProxy<E> {
    #[must_use]
    pub const fn new(id: Value) -> Self {
        Self {
            id,
            target: OnceLock::new(),
        }
    }

    #[must_use]
    pub const fn id(&self) -> &Value {
        &self.id
    }

    #[must_use]
    pub fn target(&self) -> Option<&Arc<E>> {
        self.target.get()
    }

    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.target.get().is_some()
    }

    /// Bind the proxy to its loaded entity. Returns the rejected instance
    /// if the proxy was already resolved.
    pub fn resolve(&self, instance: Arc<E>) -> Result<(), Arc<E>> {
        self.target.set(instance)
    }
}

///
/// PersistentList
///
/// Runtime instance of an indexed list attribute.
///
/// While uninitialized the elements are not known; positional mutations
/// are appended to an ordered log and applied when the owning descriptor
/// replays queued operations after initialization.
///

#[derive(Debug)]
pub struct PersistentList<E> {
    elements: Vec<Element<E>>,
    initialized: bool,
    dirty: bool,
    queued: Vec<QueuedListOp<Element<E>>>,
}

impl<E> PersistentList<E> {
    /// An initialized list holding `elements` in position order.
    #[must_use]
    pub const fn from_elements(elements: Vec<Element<E>>) -> Self {
        Self {
            elements,
            initialized: true,
            dirty: false,
            queued: Vec::new(),
        }
    }

    /// Build an initialized list by wrapping each value in a fresh handle.
    #[must_use]
    pub fn from_values(values: impl IntoIterator<Item = E>) -> Self {
        Self::from_elements(values.into_iter().map(Element::new).collect())
    }

    /// A lazy list whose elements have not been loaded yet.
    #[must_use]
    pub const fn uninitialized() -> Self {
        Self {
            elements: Vec::new(),
            initialized: false,
            dirty: false,
            queued: Vec::new(),
        }
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.elements.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    #[must_use]
    pub const fn is_initialized(&self) -> bool {
        self.initialized
    }

    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    #[must_use]
    pub fn get(&self, position: usize) -> Option<&Element<E>> {
        self.elements.get(position)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Element<E>> {
        self.elements.iter()
    }

    /// Membership by handle identity.
    #[must_use]
    pub fn contains(&self, candidate: &Element<E>) -> bool {
        self.position_of(candidate).is_some()
    }

    /// First position holding the same handle as `candidate`.
    #[must_use]
    pub fn position_of(&self, candidate: &Element<E>) -> Option<usize> {
        self.elements
            .iter()
            .position(|element| element.same_identity(candidate))
    }

    /// Append an element, or queue the append while uninitialized.
    pub fn push(&mut self, element: Element<E>) {
        if self.initialized {
            self.elements.push(element);
            self.dirty = true;
        } else {
            self.queued.push(QueuedListOp::Push { value: element });
        }
    }

    /// Insert at `position`, clamping out-of-bounds positions to the tail.
    pub fn insert(&mut self, position: usize, element: Element<E>) {
        if self.initialized {
            let idx = position.min(self.elements.len());
            self.elements.insert(idx, element);
            self.dirty = true;
        } else {
            self.queued.push(QueuedListOp::Insert {
                index: position,
                value: element,
            });
        }
    }

    /// Replace the element at `position`, returning the previous handle.
    /// Returns `None` for a missing position or when the write was queued.
    pub fn set(&mut self, position: usize, element: Element<E>) -> Option<Element<E>> {
        if !self.initialized {
            self.queued.push(QueuedListOp::Set {
                index: position,
                value: element,
            });
            return None;
        }

        let slot = self.elements.get_mut(position)?;
        self.dirty = true;

        Some(std::mem::replace(slot, element))
    }

    /// Remove the element at `position`.
    /// Returns `None` for a missing position or when the removal was queued.
    pub fn remove(&mut self, position: usize) -> Option<Element<E>> {
        if !self.initialized {
            self.queued.push(QueuedListOp::Remove { index: position });
            return None;
        }

        if position < self.elements.len() {
            self.dirty = true;
            Some(self.elements.remove(position))
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        if self.initialized {
            self.elements.clear();
            self.dirty = true;
        } else {
            self.queued.push(QueuedListOp::Clear);
        }
    }

    /// Pending operations recorded while uninitialized, oldest first.
    #[must_use]
    pub fn queued_ops(&self) -> &[QueuedListOp<Element<E>>] {
        &self.queued
    }

    #[must_use]
    pub const fn has_queued_ops(&self) -> bool {
        !self.queued.is_empty()
    }

    /// Install loaded elements. The queued log is kept for replay.
    pub(crate) fn initialize(&mut self, elements: Vec<Element<E>>) {
        self.elements = elements;
        self.initialized = true;
    }

    /// Apply the queued log to a scratch copy and commit only on success.
    /// On failure nothing changes and the log is kept.
    pub(crate) fn replay_queued(&mut self) -> Result<usize, QueuedOpError> {
        if self.queued.is_empty() {
            return Ok(0);
        }

        let mut scratch = self.elements.clone();
        apply_queued(&mut scratch, &self.queued)?;

        let applied = self.queued.len();
        self.elements = scratch;
        self.queued.clear();
        self.dirty = true;

        Ok(applied)
    }
}

impl<E> Default for PersistentList<E> {
    /// An initialized, empty list.
    fn default() -> Self {
        Self::from_elements(Vec::new())
    }
}

impl<'a, E> IntoIterator for &'a PersistentList<E> {
    type Item = &'a Element<E>;
    type IntoIter = std::slice::Iter<'a, Element<E>>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

///
/// PersistentBag
/// Unindexed, duplicate-friendly collection instance.
///

#[derive(Debug)]
pub struct PersistentBag<E> {
    elements: Vec<Element<E>>,
}

impl<E> PersistentBag<E> {
    #[must_use]
    pub const fn from_elements(elements: Vec<Element<E>>) -> Self {
        Self { elements }
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.elements.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Element<E>> {
        self.elements.iter()
    }
}

///
/// PersistentCollection
///
/// Runtime collection instance of any shape. Descriptors accept this
/// and reject shapes they do not govern.
///

#[derive(Debug)]
pub enum PersistentCollection<E> {
    List(PersistentList<E>),
    Bag(PersistentBag<E>),
}

impl<E> PersistentCollection<E> {
    #[must_use]
    pub const fn shape(&self) -> &'static str {
        match self {
            Self::List(_) => "list",
            Self::Bag(_) => "bag",
        }
    }

    #[must_use]
    pub const fn as_list(&self) -> Option<&PersistentList<E>> {
        match self {
            Self::List(list) => Some(list),
            Self::Bag(_) => None,
        }
    }

    #[must_use]
    pub const fn as_list_mut(&mut self) -> Option<&mut PersistentList<E>> {
        match self {
            Self::List(list) => Some(list),
            Self::Bag(_) => None,
        }
    }
}

impl<E> From<PersistentList<E>> for PersistentCollection<E> {
    fn from(list: PersistentList<E>) -> Self {
        Self::List(list)
    }
}

impl<E> From<PersistentBag<E>> for PersistentCollection<E> {
    fn from(bag: PersistentBag<E>) -> Self {
        Self::Bag(bag)
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(list: &PersistentList<String>) -> Vec<Option<&str>> {
        list.iter().map(|e| e.get().map(String::as_str)).collect()
    }

    #[test]
    fn identity_ignores_equal_contents() {
        let a = Element::new("a".to_string());
        let a_again = Element::new("a".to_string());

        assert!(a.same_identity(&a.clone()));
        assert!(!a.same_identity(&a_again));
        assert!(Element::<String>::Null.same_identity(&Element::Null));
    }

    #[test]
    fn resolved_proxy_is_not_its_target() {
        let target = Arc::new("x".to_string());
        let instance = Element::Instance(Arc::clone(&target));
        let proxy = Element::<String>::proxy(Value::Int(1));

        if let Element::Proxy(p) = &proxy {
            p.resolve(Arc::clone(&target)).expect("first resolve succeeds");
            assert!(p.resolve(target).is_err());
        }

        assert_eq!(proxy.get().map(String::as_str), Some("x"));
        assert!(!proxy.same_identity(&instance));
    }

    #[test]
    fn initialized_list_mutates_in_place() {
        let mut list = PersistentList::from_values(["a".to_string(), "b".to_string()]);

        list.insert(10, Element::new("c".to_string()));
        let removed = list.remove(0);

        assert_eq!(removed.and_then(|e| e.get().cloned()).as_deref(), Some("a"));
        assert_eq!(texts(&list), vec![Some("b"), Some("c")]);
        assert!(list.is_dirty());
        assert!(!list.has_queued_ops());
    }

    #[test]
    fn uninitialized_list_queues_mutations() {
        let mut list = PersistentList::<String>::uninitialized();

        list.push(Element::new("a".to_string()));
        assert_eq!(list.remove(0).map(|_| ()), None);
        list.clear();

        assert!(list.is_empty());
        assert_eq!(list.queued_ops().len(), 3);
        assert!(!list.is_dirty());
    }

    #[test]
    fn replay_commits_only_on_success() {
        let mut list = PersistentList::<String>::uninitialized();
        list.push(Element::new("c".to_string()));
        list.set(7, Element::new("z".to_string()));
        list.initialize(vec![Element::new("a".to_string())]);

        assert!(list.replay_queued().is_err());
        assert_eq!(texts(&list), vec![Some("a")]);
        assert_eq!(list.queued_ops().len(), 2);
    }

    #[test]
    fn collection_shape_labels() {
        let list: PersistentCollection<String> = PersistentList::from_values(Vec::new()).into();
        let bag: PersistentCollection<String> = PersistentBag::from_elements(Vec::new()).into();

        assert_eq!(list.shape(), "list");
        assert_eq!(bag.shape(), "bag");
        assert!(bag.as_list().is_none());
    }
}
