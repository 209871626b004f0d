//! Query-result wiring for collections.
//!
//! Domain results describe which row positions a query reads for one
//! navigable path. They are built per query through a
//! [`DomainResultCreationState`], which owns SQL selection allocation and
//! keeps every registered result so later row-processing stages can find it.

mod initializer;
mod producer;

pub use initializer::{CollectionInitializer, CollectionKey, ListInitializer, RowProcessingState};
pub use producer::{CollectionInitializerProducer, FetchParent, ListInitializerProducer, LockMode};

use crate::{
    collection::{CollectionElement, CollectionIndex, ElementNature},
    error::InternalError,
    model::{NavigablePath, SelectionSource},
    value::ValueKind,
};

///
/// SqlSelection
/// One value position in the rows a query produces.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SqlSelection {
    pub position: usize,
    pub source: SelectionSource,
}

///
/// BasicResult
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BasicResult {
    pub path: NavigablePath,
    pub result_variable: Option<String>,
    pub selection: SqlSelection,
    pub kind: ValueKind,
    pub nullable: bool,
}

///
/// EntityResult
/// An associated entity read by identifier; the entity itself is resolved later.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EntityResult {
    pub path: NavigablePath,
    pub result_variable: Option<String>,
    pub entity_name: String,
    pub identifier: SqlSelection,
    pub nullable: bool,
}

///
/// DomainResult
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DomainResult {
    Basic(BasicResult),
    Entity(EntityResult),
}

impl DomainResult {
    #[must_use]
    pub const fn path(&self) -> &NavigablePath {
        match self {
            Self::Basic(result) => &result.path,
            Self::Entity(result) => &result.path,
        }
    }

    /// The selection this result reads its row value from.
    #[must_use]
    pub const fn selection(&self) -> &SqlSelection {
        match self {
            Self::Basic(result) => &result.selection,
            Self::Entity(result) => &result.identifier,
        }
    }

    #[must_use]
    pub fn result_variable(&self) -> Option<&str> {
        match self {
            Self::Basic(result) => result.result_variable.as_deref(),
            Self::Entity(result) => result.result_variable.as_deref(),
        }
    }
}

///
/// DomainResultCreationState
///
/// Query-compilation collaborator that allocates row positions and keeps
/// the domain results built for the current query.
///

pub trait DomainResultCreationState {
    /// Resolve (or allocate) the row position reading `source` for `path`.
    fn resolve_sql_selection(
        &mut self,
        path: &NavigablePath,
        source: &SelectionSource,
    ) -> Result<SqlSelection, InternalError>;

    /// Make a built domain result visible to row processing.
    fn register_domain_result(&mut self, result: &DomainResult) -> Result<(), InternalError>;
}

///
/// SelectionCollector
///
/// In-memory creation state: positions are allocated in request order and
/// never shared, so every resolve call yields a fresh selection.
///

#[derive(Debug, Default)]
pub struct SelectionCollector {
    selections: Vec<SqlSelection>,
    results: Vec<DomainResult>,
}

impl SelectionCollector {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn selection_count(&self) -> usize {
        self.selections.len()
    }

    #[must_use]
    pub fn selections(&self) -> &[SqlSelection] {
        &self.selections
    }

    #[must_use]
    pub fn results(&self) -> &[DomainResult] {
        &self.results
    }

    /// Most recently registered result for `path`.
    #[must_use]
    pub fn result_for(&self, path: &NavigablePath) -> Option<&DomainResult> {
        self.results.iter().rev().find(|result| result.path() == path)
    }
}

impl DomainResultCreationState for SelectionCollector {
    fn resolve_sql_selection(
        &mut self,
        _path: &NavigablePath,
        source: &SelectionSource,
    ) -> Result<SqlSelection, InternalError> {
        let selection = SqlSelection {
            position: self.selections.len(),
            source: source.clone(),
        };
        self.selections.push(selection.clone());

        Ok(selection)
    }

    fn register_domain_result(&mut self, result: &DomainResult) -> Result<(), InternalError> {
        self.results.push(result.clone());

        Ok(())
    }
}

/// Build and register the domain result reading a list's index position.
pub fn generate_collection_index_domain_result(
    path: NavigablePath,
    index: &CollectionIndex,
    result_variable: Option<&str>,
    creation_state: &mut dyn DomainResultCreationState,
) -> Result<DomainResult, InternalError> {
    let selection = creation_state.resolve_sql_selection(&path, index.source())?;
    let result = DomainResult::Basic(BasicResult {
        path,
        result_variable: result_variable.map(ToString::to_string),
        selection,
        kind: index.kind(),
        nullable: index.is_nullable(),
    });
    creation_state.register_domain_result(&result)?;

    Ok(result)
}

/// Build and register the domain result reading a collection's element position.
pub fn generate_collection_element_domain_result(
    path: NavigablePath,
    element: &CollectionElement,
    result_variable: Option<&str>,
    creation_state: &mut dyn DomainResultCreationState,
) -> Result<DomainResult, InternalError> {
    let selection = creation_state.resolve_sql_selection(&path, element.source())?;
    let result_variable = result_variable.map(ToString::to_string);

    let result = match element.nature() {
        ElementNature::Basic(kind) => DomainResult::Basic(BasicResult {
            path,
            result_variable,
            selection,
            kind: *kind,
            nullable: element.is_nullable(),
        }),
        ElementNature::Entity { entity_name } => DomainResult::Entity(EntityResult {
            path,
            result_variable,
            entity_name: entity_name.clone(),
            identifier: selection,
            nullable: element.is_nullable(),
        }),
    };
    creation_state.register_domain_result(&result)?;

    Ok(result)
}

///
/// TESTS
///
