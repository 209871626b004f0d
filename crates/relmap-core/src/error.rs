use std::fmt;
use thiserror::Error as ThisError;

///
/// InternalError
///
/// Structured runtime error with a stable internal classification.
/// Not a stable API; intended for internal use and may change without notice.
///

#[derive(Debug, ThisError)]
#[error("{message}")]
pub struct InternalError {
    pub class: ErrorClass,
    pub origin: ErrorOrigin,
    pub message: String,

    /// Optional structured error detail.
    /// The variant (if present) must correspond to `class`.
    pub detail: Option<ErrorDetail>,
}

impl InternalError {
    /// Construct an InternalError without detail.
    pub fn new(class: ErrorClass, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            class,
            origin,
            message: message.into(),
            detail: None,
        }
    }

    /// Construct a mapping-origin configuration error.
    pub(crate) fn configuration(detail: ConfigurationError) -> Self {
        Self {
            class: ErrorClass::Configuration,
            origin: ErrorOrigin::Mapping,
            message: detail.to_string(),
            detail: Some(ErrorDetail::Configuration(detail)),
        }
    }

    /// Construct a type mismatch for a specific origin.
    pub(crate) fn type_mismatch(origin: ErrorOrigin, detail: TypeMismatchError) -> Self {
        Self {
            class: ErrorClass::TypeMismatch,
            origin,
            message: detail.to_string(),
            detail: Some(ErrorDetail::TypeMismatch(detail)),
        }
    }

    /// Construct a collection-origin invariant violation.
    pub(crate) fn collection_invariant(message: impl Into<String>) -> Self {
        Self::new(
            ErrorClass::InvariantViolation,
            ErrorOrigin::Collection,
            message.into(),
        )
    }

    /// Construct a result-origin invariant violation.
    pub(crate) fn result_invariant(message: impl Into<String>) -> Self {
        Self::new(
            ErrorClass::InvariantViolation,
            ErrorOrigin::Result,
            message.into(),
        )
    }

    /// Construct a query-origin unsupported error.
    pub(crate) fn query_unsupported(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Unsupported, ErrorOrigin::Query, message.into())
    }

    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(self.class, ErrorClass::Configuration)
    }

    #[must_use]
    pub const fn is_type_mismatch(&self) -> bool {
        matches!(self.class, ErrorClass::TypeMismatch)
    }

    #[must_use]
    pub fn display_with_class(&self) -> String {
        format!("{}:{}: {}", self.origin, self.class, self.message)
    }
}

///
/// ErrorDetail
///
/// Structured, class-specific error detail carried by [`InternalError`].
///

#[derive(Debug, ThisError)]
pub enum ErrorDetail {
    #[error("{0}")]
    Configuration(ConfigurationError),
    #[error("{0}")]
    TypeMismatch(TypeMismatchError),
}

///
/// ConfigurationError
///
/// The boot-time mapping is structurally wrong for the descriptor being built.
/// Fatal for mapping-model construction; never retried.
///

#[derive(Debug, ThisError)]
pub enum ConfigurationError {
    #[error("property '{property}' is not a collection mapping")]
    NotACollection { property: String },

    #[error("collection '{role}' is mapped as {found}, expected an indexed list")]
    NotAnIndexedCollection { role: String, found: &'static str },

    #[error("collection '{role}' declares no index column or formula")]
    MissingIndex { role: String },

    #[error("collection '{role}' index must be an integer type, found {found}")]
    NonIntegerIndex { role: String, found: String },

    #[error("collection '{role}' declares both an index column and an index formula")]
    AmbiguousIndexSource { role: String },

    #[error("collection '{role}' has negative list index base {base}")]
    NegativeIndexBase { role: String, base: i64 },

    #[error("collection '{role}' element is declared as {declared}, but the element type is {expected}")]
    ElementTypeMismatch {
        role: String,
        declared: String,
        expected: String,
    },

    #[error("owner type '{owner}' does not match managed type '{container}'")]
    OwnerMismatch { owner: String, container: String },
}

///
/// TypeMismatchError
///
/// A runtime value does not have the shape its descriptor declares.
/// Always a programmer error; never recovered.
///

#[derive(Debug, ThisError)]
pub enum TypeMismatchError {
    #[error("collection '{role}' expected a {expected} instance, found {found}")]
    CollectionShape {
        role: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("collection '{role}' could not decode {position} value {value}")]
    RowValue {
        role: String,
        position: &'static str,
        value: String,
    },

    #[error("descriptor '{role}' is registered with different owner/element types")]
    DescriptorTypes { role: String },
}

///
/// ErrorClass
/// Internal error taxonomy for runtime classification.
/// Not a stable API; may change without notice.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorClass {
    Configuration,
    TypeMismatch,
    InvariantViolation,
    Unsupported,
    Internal,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Configuration => "configuration",
            Self::TypeMismatch => "type_mismatch",
            Self::InvariantViolation => "invariant_violation",
            Self::Unsupported => "unsupported",
            Self::Internal => "internal",
        };
        write!(f, "{label}")
    }
}

///
/// ErrorOrigin
/// Internal origin taxonomy for runtime classification.
/// Not a stable API; may change without notice.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorOrigin {
    Mapping,
    Collection,
    Result,
    Query,
    Registry,
}

impl fmt::Display for ErrorOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Mapping => "mapping",
            Self::Collection => "collection",
            Self::Result => "result",
            Self::Query => "query",
            Self::Registry => "registry",
        };
        write!(f, "{label}")
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configuration_errors_carry_detail() {
        let err = InternalError::configuration(ConfigurationError::MissingIndex {
            role: "Person.tags".to_string(),
        });

        assert!(err.is_configuration());
        assert_eq!(err.origin, ErrorOrigin::Mapping);
        assert!(matches!(
            err.detail,
            Some(ErrorDetail::Configuration(ConfigurationError::MissingIndex { .. }))
        ));
        assert_eq!(
            err.display_with_class(),
            "mapping:configuration: collection 'Person.tags' declares no index column or formula"
        );
    }

    #[test]
    fn type_mismatch_keeps_origin() {
        let err = InternalError::type_mismatch(
            ErrorOrigin::Collection,
            TypeMismatchError::CollectionShape {
                role: "Person.tags".to_string(),
                expected: "list",
                found: "bag",
            },
        );

        assert!(err.is_type_mismatch());
        assert_eq!(err.origin, ErrorOrigin::Collection);
        assert!(err.message.contains("expected a list instance, found bag"));
    }
}
