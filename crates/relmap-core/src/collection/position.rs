use crate::{
    error::{ConfigurationError, InternalError},
    model::{BootElement, BootElementNature, BootIndex, SelectionSource},
    traits::ElementValueKind,
    value::{Value, ValueKind},
};
use std::fmt;

///
/// CollectionIndex
///
/// Storage shape of a list's index position: an integer read from a
/// dedicated column or computed by a formula. Stored values start at
/// `base`; position 0 is stored as `base`.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CollectionIndex {
    kind: ValueKind,
    source: SelectionSource,
    base: i64,
}

impl CollectionIndex {
    pub const NAVIGABLE_NAME: &'static str = "{index}";

    pub(crate) fn from_boot(
        role: &str,
        boot: &BootIndex,
        default_base: i64,
    ) -> Result<Self, InternalError> {
        if !boot.kind.is_integer() {
            return Err(InternalError::configuration(
                ConfigurationError::NonIntegerIndex {
                    role: role.to_string(),
                    found: boot.kind.to_string(),
                },
            ));
        }

        let source = match (&boot.column, &boot.formula) {
            (Some(column), None) => SelectionSource::Column(column.clone()),
            (None, Some(formula)) => SelectionSource::Formula(formula.clone()),
            (Some(_), Some(_)) => {
                return Err(InternalError::configuration(
                    ConfigurationError::AmbiguousIndexSource {
                        role: role.to_string(),
                    },
                ));
            }
            (None, None) => {
                return Err(InternalError::configuration(
                    ConfigurationError::MissingIndex {
                        role: role.to_string(),
                    },
                ));
            }
        };

        let base = boot.base.unwrap_or(default_base);
        if base < 0 {
            return Err(InternalError::configuration(
                ConfigurationError::NegativeIndexBase {
                    role: role.to_string(),
                    base,
                },
            ));
        }

        Ok(Self { kind: boot.kind, source, base })
    }

    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        self.kind
    }

    #[must_use]
    pub const fn source(&self) -> &SelectionSource {
        &self.source
    }

    #[must_use]
    pub const fn base(&self) -> i64 {
        self.base
    }

    /// List indexes are never nullable.
    #[must_use]
    pub const fn is_nullable(&self) -> bool {
        false
    }

    #[must_use]
    pub const fn contains_formula(&self) -> bool {
        self.source.is_formula()
    }

    /// Stored index value for a list position.
    #[must_use]
    pub fn index_value_for(&self, position: usize) -> Value {
        let offset = i64::try_from(position).unwrap_or(i64::MAX);

        Value::Int(self.base.saturating_add(offset))
    }

    /// List position for a stored index value; `None` below the base or
    /// for non-integer values.
    #[must_use]
    pub fn position_for(&self, value: &Value) -> Option<usize> {
        let stored = value.as_i64()?;

        usize::try_from(stored.checked_sub(self.base)?).ok()
    }
}

///
/// ElementNature
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ElementNature {
    Basic(ValueKind),
    Entity { entity_name: String },
}

impl fmt::Display for ElementNature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Basic(kind) => write!(f, "basic {kind}"),
            Self::Entity { entity_name } => write!(f, "entity {entity_name}"),
        }
    }
}

///
/// CollectionElement
/// Storage shape of a collection's element position.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CollectionElement {
    nature: ElementNature,
    source: SelectionSource,
    nullable: bool,
}

impl CollectionElement {
    pub const NAVIGABLE_NAME: &'static str = "{element}";

    pub(crate) fn from_boot(
        role: &str,
        boot: &BootElement,
        expected: ElementValueKind,
    ) -> Result<Self, InternalError> {
        let nature = match &boot.nature {
            BootElementNature::Basic(kind) => ElementNature::Basic(*kind),
            BootElementNature::Entity { entity_name } => ElementNature::Entity {
                entity_name: entity_name.clone(),
            },
        };

        let compatible = match (&nature, expected) {
            (ElementNature::Basic(declared), ElementValueKind::Basic(kind)) => {
                kind.accepts(*declared)
            }
            (ElementNature::Entity { .. }, ElementValueKind::Entity) => true,
            _ => false,
        };
        if !compatible {
            return Err(InternalError::configuration(
                ConfigurationError::ElementTypeMismatch {
                    role: role.to_string(),
                    declared: nature.to_string(),
                    expected: match expected {
                        ElementValueKind::Basic(kind) => format!("basic {kind}"),
                        ElementValueKind::Entity => "an entity".to_string(),
                    },
                },
            ));
        }

        Ok(Self {
            nature,
            source: SelectionSource::Column(boot.column.clone()),
            nullable: boot.nullable,
        })
    }

    #[must_use]
    pub const fn nature(&self) -> &ElementNature {
        &self.nature
    }

    #[must_use]
    pub const fn source(&self) -> &SelectionSource {
        &self.source
    }

    #[must_use]
    pub const fn is_nullable(&self) -> bool {
        self.nullable
    }

    #[must_use]
    pub const fn is_entity(&self) -> bool {
        matches!(self.nature, ElementNature::Entity { .. })
    }

    /// Row type of the element column; entity elements are read by identifier.
    #[must_use]
    pub const fn value_kind(&self) -> Option<ValueKind> {
        match self.nature {
            ElementNature::Basic(kind) => Some(kind),
            ElementNature::Entity { .. } => None,
        }
    }
}

///
/// TESTS
///
