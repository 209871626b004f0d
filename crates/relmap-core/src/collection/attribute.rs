use crate::{
    collection::{CollectionRole, instance::PersistentList, position::ElementNature},
    model::CollectionClassification,
};
use std::sync::Arc;

///
/// PropertyAccess
///
/// Reads and writes one attribute value on an owner instance.
/// How the value is reached (field, accessor, generated code) is up to
/// the implementor.
///

pub trait PropertyAccess<O, V>: Send + Sync {
    fn get<'a>(&self, owner: &'a O) -> &'a V;

    fn get_mut<'a>(&self, owner: &'a mut O) -> &'a mut V;
}

///
/// FieldAccess
/// Property access through plain field projections.
///

pub struct FieldAccess<O, V> {
    getter: fn(&O) -> &V,
    getter_mut: fn(&mut O) -> &mut V,
}

impl<O, V> FieldAccess<O, V> {
    #[must_use]
    pub const fn new(getter: fn(&O) -> &V, getter_mut: fn(&mut O) -> &mut V) -> Self {
        Self { getter, getter_mut }
    }
}

impl<O, V> PropertyAccess<O, V> for FieldAccess<O, V> {
    fn get<'a>(&self, owner: &'a O) -> &'a V {
        (self.getter)(owner)
    }

    fn get_mut<'a>(&self, owner: &'a mut O) -> &'a mut V {
        (self.getter_mut)(owner)
    }
}

///
/// PluralAttribute
/// Mapping-model view of a collection-valued attribute.
///

pub trait PluralAttribute {
    fn name(&self) -> &str;

    fn role(&self) -> &CollectionRole;

    fn classification(&self) -> CollectionClassification;

    fn element_nature(&self) -> &ElementNature;
}

///
/// ListAttribute
///

pub struct ListAttribute<O, E> {
    name: String,
    role: CollectionRole,
    element: ElementNature,
    access: Arc<dyn PropertyAccess<O, PersistentList<E>>>,
}

impl<O, E> ListAttribute<O, E> {
    pub(crate) fn new(
        name: String,
        role: CollectionRole,
        element: ElementNature,
        access: Arc<dyn PropertyAccess<O, PersistentList<E>>>,
    ) -> Self {
        Self {
            name,
            role,
            element,
            access,
        }
    }

    /// The list held by `owner` for this attribute.
    #[must_use]
    pub fn list<'a>(&self, owner: &'a O) -> &'a PersistentList<E> {
        self.access.get(owner)
    }

    pub fn list_mut<'a>(&self, owner: &'a mut O) -> &'a mut PersistentList<E> {
        self.access.get_mut(owner)
    }
}

impl<O, E> PluralAttribute for ListAttribute<O, E> {
    fn name(&self) -> &str {
        &self.name
    }

    fn role(&self) -> &CollectionRole {
        &self.role
    }

    fn classification(&self) -> CollectionClassification {
        CollectionClassification::List
    }

    fn element_nature(&self) -> &ElementNature {
        &self.element
    }
}

impl<O, E> std::fmt::Debug for ListAttribute<O, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListAttribute")
            .field("name", &self.name)
            .field("role", &self.role)
            .field("element", &self.element)
            .finish_non_exhaustive()
    }
}
