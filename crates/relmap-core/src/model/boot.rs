use crate::value::ValueKind;
use std::fmt;

///
/// BootProperty
/// One declared attribute of a mapped type, as produced by mapping parsing.
///

#[derive(Clone, Debug)]
pub struct BootProperty {
    pub name: String,
    pub value: BootValue,
}

impl BootProperty {
    #[must_use]
    pub fn new(name: impl Into<String>, value: BootValue) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

///
/// BootValue
///

#[derive(Clone, Debug)]
pub enum BootValue {
    Basic {
        kind: ValueKind,
        source: SelectionSource,
    },
    Collection(BootCollection),
}

///
/// CollectionClassification
///
/// Declared semantic of a collection attribute. Only `List` is indexed
/// by position; the others are structurally analogous shapes.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CollectionClassification {
    List,
    Bag,
    Set,
    Map,
}

impl CollectionClassification {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Bag => "bag",
            Self::Set => "set",
            Self::Map => "map",
        }
    }

    #[must_use]
    pub const fn is_indexed(self) -> bool {
        matches!(self, Self::List | Self::Map)
    }
}

impl fmt::Display for CollectionClassification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

///
/// BootCollection
///

#[derive(Clone, Debug)]
pub struct BootCollection {
    pub classification: CollectionClassification,
    pub table: String,
    pub key_column: String,
    pub index: Option<BootIndex>,
    pub element: BootElement,
}

impl BootCollection {
    /// An indexed list mapping.
    #[must_use]
    pub fn list(
        table: impl Into<String>,
        key_column: impl Into<String>,
        index: BootIndex,
        element: BootElement,
    ) -> Self {
        Self {
            classification: CollectionClassification::List,
            table: table.into(),
            key_column: key_column.into(),
            index: Some(index),
            element,
        }
    }

    /// An unindexed bag mapping.
    #[must_use]
    pub fn bag(
        table: impl Into<String>,
        key_column: impl Into<String>,
        element: BootElement,
    ) -> Self {
        Self {
            classification: CollectionClassification::Bag,
            table: table.into(),
            key_column: key_column.into(),
            index: None,
            element,
        }
    }

    #[must_use]
    pub const fn index(&self) -> Option<&BootIndex> {
        self.index.as_ref()
    }
}

///
/// BootIndex
///
/// Declared index position. Exactly one of `column` and `formula`
/// should be present; the descriptor rejects anything else.
///

#[derive(Clone, Debug)]
pub struct BootIndex {
    pub kind: ValueKind,
    pub column: Option<String>,
    pub formula: Option<String>,
    pub base: Option<i64>,
}

impl BootIndex {
    #[must_use]
    pub fn column(name: impl Into<String>) -> Self {
        Self {
            kind: ValueKind::Int,
            column: Some(name.into()),
            formula: None,
            base: None,
        }
    }

    #[must_use]
    pub fn formula(sql: impl Into<String>) -> Self {
        Self {
            kind: ValueKind::Int,
            column: None,
            formula: Some(sql.into()),
            base: None,
        }
    }

    #[must_use]
    pub const fn with_base(mut self, base: i64) -> Self {
        self.base = Some(base);
        self
    }

    #[must_use]
    pub const fn has_formula(&self) -> bool {
        self.formula.is_some()
    }
}

///
/// BootElement
///

#[derive(Clone, Debug)]
pub struct BootElement {
    pub nature: BootElementNature,
    pub column: String,
    pub nullable: bool,
}

impl BootElement {
    #[must_use]
    pub fn basic(kind: ValueKind, column: impl Into<String>) -> Self {
        Self {
            nature: BootElementNature::Basic(kind),
            column: column.into(),
            nullable: false,
        }
    }

    #[must_use]
    pub fn entity(entity_name: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            nature: BootElementNature::Entity {
                entity_name: entity_name.into(),
            },
            column: column.into(),
            nullable: false,
        }
    }

    #[must_use]
    pub const fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }
}

///
/// BootElementNature
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum BootElementNature {
    Basic(ValueKind),
    Entity { entity_name: String },
}

///
/// SelectionSource
/// Where a row position's value comes from.
///

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum SelectionSource {
    Column(String),
    Formula(String),
}

impl SelectionSource {
    #[must_use]
    pub const fn is_formula(&self) -> bool {
        matches!(self, Self::Formula(_))
    }
}

impl fmt::Display for SelectionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Column(name) => write!(f, "{name}"),
            Self::Formula(sql) => write!(f, "({sql})"),
        }
    }
}
