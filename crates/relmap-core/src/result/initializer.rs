use crate::{
    collection::{
        CollectionRole, Element, ElementNature, PersistentCollection, PersistentList,
        PersistentListDescriptor,
    },
    error::{ErrorOrigin, InternalError, TypeMismatchError},
    obs::MetricsEvent,
    result::SqlSelection,
    traits::{ElementValue, OwnerKind},
    value::Value,
};
use std::fmt;

///
/// CollectionKey
/// Identifies one collection instance: the role plus the owner's identifier.
///

#[derive(Clone, Debug, PartialEq)]
pub struct CollectionKey {
    role: CollectionRole,
    owner_id: Value,
}

impl CollectionKey {
    #[must_use]
    pub const fn new(role: CollectionRole, owner_id: Value) -> Self {
        Self { role, owner_id }
    }

    #[must_use]
    pub const fn role(&self) -> &CollectionRole {
        &self.role
    }

    #[must_use]
    pub const fn owner_id(&self) -> &Value {
        &self.owner_id
    }
}

impl fmt::Display for CollectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.role, self.owner_id)
    }
}

///
/// RowProcessingState
/// The current result row, addressed by selection position.
///

#[derive(Clone, Copy, Debug)]
pub struct RowProcessingState<'r> {
    row: &'r [Value],
}

impl<'r> RowProcessingState<'r> {
    #[must_use]
    pub const fn new(row: &'r [Value]) -> Self {
        Self { row }
    }

    pub fn value_at(&self, selection: &SqlSelection) -> Result<&'r Value, InternalError> {
        self.row.get(selection.position).ok_or_else(|| {
            InternalError::result_invariant(format!(
                "row has {} values, selection '{}' reads position {}",
                self.row.len(),
                selection.source,
                selection.position
            ))
        })
    }
}

///
/// CollectionInitializer
///
/// Accumulates result rows into one collection instance.
///

pub trait CollectionInitializer<E> {
    fn key(&self) -> &CollectionKey;

    fn read_row(&mut self, row: &RowProcessingState<'_>) -> Result<(), InternalError>;

    /// The populated collection.
    fn finish(self) -> Result<PersistentCollection<E>, InternalError>
    where
        Self: Sized;
}

///
/// ListInitializer
///
/// Each row carries one stored index and one element. The element lands at
/// `index - base`; positions no row mentions stay null. Rows whose index and
/// element are both null come from an outer join with an empty collection
/// and are skipped.
///

pub struct ListInitializer<'d, O, E> {
    descriptor: &'d PersistentListDescriptor<O, E>,
    key: CollectionKey,
    index_selection: SqlSelection,
    element_selection: SqlSelection,
    slots: Vec<Element<E>>,
    rows: u64,
}

impl<'d, O, E> ListInitializer<'d, O, E>
where
    O: OwnerKind,
    E: ElementValue,
{
    pub(crate) const fn new(
        descriptor: &'d PersistentListDescriptor<O, E>,
        key: CollectionKey,
        index_selection: SqlSelection,
        element_selection: SqlSelection,
    ) -> Self {
        Self {
            descriptor,
            key,
            index_selection,
            element_selection,
            slots: Vec::new(),
            rows: 0,
        }
    }

    /// Rows accumulated so far, skipped rows excluded.
    #[must_use]
    pub const fn rows_read(&self) -> u64 {
        self.rows
    }

    /// Load the accumulated elements into an existing uninitialized list,
    /// keeping any mutations it queued.
    pub fn initialize(self, target: &mut PersistentList<E>) -> Result<(), InternalError> {
        if target.is_initialized() {
            return Err(InternalError::collection_invariant(format!(
                "collection '{}' is already initialized",
                self.key
            )));
        }

        let slots = self.complete();
        target.initialize(slots);

        Ok(())
    }

    fn complete(self) -> Vec<Element<E>> {
        self.descriptor.record(MetricsEvent::RowsAccumulated {
            role: self.descriptor.role().as_str(),
            rows: self.rows,
        });

        self.slots
    }

    fn position(&self, index: &Value) -> Result<usize, InternalError> {
        let stored = index.as_i64().ok_or_else(|| {
            InternalError::type_mismatch(
                ErrorOrigin::Result,
                TypeMismatchError::RowValue {
                    role: self.key.role().to_string(),
                    position: "index",
                    value: index.to_string(),
                },
            )
        })?;

        let position = self
            .descriptor
            .index()
            .position_for(&Value::Int(stored))
            .ok_or_else(|| {
                InternalError::result_invariant(format!(
                    "collection '{}' row index {stored} is below list base {}",
                    self.key,
                    self.descriptor.index().base()
                ))
            })?;

        let max = self.descriptor.max_position();
        if position > max {
            return Err(InternalError::result_invariant(format!(
                "collection '{}' row index {stored} is past the largest list position {max}",
                self.key
            )));
        }

        Ok(position)
    }

    fn element(&self, value: &Value) -> Result<Element<E>, InternalError> {
        if value.is_null() {
            return Ok(Element::Null);
        }

        match self.descriptor.element().nature() {
            ElementNature::Entity { .. } => Ok(Element::proxy(value.clone())),
            ElementNature::Basic(_) => E::from_value(value).map(Element::new).ok_or_else(|| {
                InternalError::type_mismatch(
                    ErrorOrigin::Result,
                    TypeMismatchError::RowValue {
                        role: self.key.role().to_string(),
                        position: "element",
                        value: value.to_string(),
                    },
                )
            }),
        }
    }
}

impl<O, E> CollectionInitializer<E> for ListInitializer<'_, O, E>
where
    O: OwnerKind,
    E: ElementValue,
{
    fn key(&self) -> &CollectionKey {
        &self.key
    }

    fn read_row(&mut self, row: &RowProcessingState<'_>) -> Result<(), InternalError> {
        let index = row.value_at(&self.index_selection)?;
        let element = row.value_at(&self.element_selection)?;

        if index.is_null() {
            if element.is_null() {
                return Ok(());
            }

            return Err(InternalError::result_invariant(format!(
                "collection '{}' row has a null list index",
                self.key
            )));
        }

        let position = self.position(index)?;
        let element = self.element(element)?;

        if position >= self.slots.len() {
            let len = position.checked_add(1).ok_or_else(|| {
                InternalError::result_invariant(format!(
                    "collection '{}' list position {position} overflows",
                    self.key
                ))
            })?;
            self.slots.resize_with(len, || Element::Null);
        }
        self.slots[position] = element;
        self.rows += 1;

        Ok(())
    }

    fn finish(self) -> Result<PersistentCollection<E>, InternalError> {
        Ok(PersistentList::from_elements(self.complete()).into())
    }
}

impl<O, E> fmt::Debug for ListInitializer<'_, O, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListInitializer")
            .field("key", &self.key)
            .field("index_selection", &self.index_selection)
            .field("element_selection", &self.element_selection)
            .field("slots", &self.slots.len())
            .field("rows", &self.rows)
            .finish_non_exhaustive()
    }
}

///
/// TESTS
///
