use crate::value::{Value, ValueKind};

///
/// Path
///
/// Stable name of a mapped type, used for roles and diagnostics.
///

pub trait Path {
    const PATH: &'static str;
}

/// Marker for owning entity types. Owner tags are shared across threads
/// together with the descriptors that name them.
pub trait OwnerKind: Path + Send + Sync + 'static {}
impl<T> OwnerKind for T where T: Path + Send + Sync + 'static {}

///
/// ElementValueKind
///
/// How a collection element is represented in a row.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ElementValueKind {
    /// The element is read directly from its column.
    Basic(ValueKind),

    /// The row holds an entity identifier; the element is an entity.
    Entity,
}

///
/// ElementValue
///
/// Conversion boundary between typed collection elements and row values.
///

pub trait ElementValue: Send + Sync + 'static {
    fn kind() -> ElementValueKind
    where
        Self: Sized;

    fn to_value(&self) -> Value;

    #[must_use]
    fn from_value(value: &Value) -> Option<Self>
    where
        Self: Sized;
}

impl ElementValue for String {
    fn kind() -> ElementValueKind {
        ElementValueKind::Basic(ValueKind::Text)
    }

    fn to_value(&self) -> Value {
        Value::Text(self.clone())
    }

    fn from_value(value: &Value) -> Option<Self> {
        value.as_text().map(ToString::to_string)
    }
}

impl ElementValue for bool {
    fn kind() -> ElementValueKind {
        ElementValueKind::Basic(ValueKind::Bool)
    }

    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }
}

impl ElementValue for i64 {
    fn kind() -> ElementValueKind {
        ElementValueKind::Basic(ValueKind::Int)
    }

    fn to_value(&self) -> Value {
        Value::Int(*self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        value.as_i64()
    }
}

impl ElementValue for u64 {
    fn kind() -> ElementValueKind {
        ElementValueKind::Basic(ValueKind::Uint)
    }

    fn to_value(&self) -> Value {
        Value::Uint(*self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Uint(v) => Some(*v),
            Value::Int(v) => Self::try_from(*v).ok(),
            _ => None,
        }
    }
}

impl ElementValue for f64 {
    fn kind() -> ElementValueKind {
        ElementValueKind::Basic(ValueKind::Float64)
    }

    fn to_value(&self) -> Value {
        Value::Float64(*self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Float64(v) => Some(*v),
            _ => None,
        }
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsigned_elements_accept_non_negative_ints() {
        assert_eq!(u64::from_value(&Value::Int(4)), Some(4));
        assert_eq!(u64::from_value(&Value::Int(-4)), None);
    }

    #[test]
    fn text_elements_round_trip_through_rows() {
        let value = "tag".to_string().to_value();

        assert_eq!(String::from_value(&value).as_deref(), Some("tag"));
        assert_eq!(String::from_value(&Value::Int(1)), None);
    }
}
