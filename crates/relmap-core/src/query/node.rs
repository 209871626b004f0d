use crate::{
    model::NavigablePath,
    query::expr::{
        ParameterLabel, SqmAttributeReference, SqmExpression, SqmFunction, SqmLiteral,
        SqmParameter, SqmStar,
    },
    value::{Value, ValueKind},
};
use derive_more::Display;
use std::sync::atomic::{AtomicU64, Ordering};

///
/// NodeId
/// Identifies a node within the trees built by one [`NodeBuilder`].
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[display("node#{_0}")]
pub struct NodeId(u64);

impl NodeId {
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

///
/// NodeBuilder
///
/// Creates expression nodes for one query translation. Ids are unique per
/// builder and increase in creation order. The counter is 64 bits wide; a
/// builder that would hand out an id past `u64::MAX` aborts instead of
/// reusing one.
///

#[derive(Debug, Default)]
pub struct NodeBuilder {
    next: AtomicU64,
}

impl NodeBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes built so far.
    #[must_use]
    pub fn nodes_built(&self) -> u64 {
        self.next.load(Ordering::Relaxed)
    }

    #[cfg(test)]
    const fn starting_at(first: u64) -> Self {
        Self {
            next: AtomicU64::new(first),
        }
    }

    fn next_id(&self) -> NodeId {
        let issued = self
            .next
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |id| id.checked_add(1));

        match issued {
            Ok(id) => NodeId(id),
            Err(_) => std::process::abort(),
        }
    }

    #[must_use]
    pub fn star(&self) -> SqmExpression {
        SqmExpression::Star(SqmStar::new(self.next_id()))
    }

    #[must_use]
    pub fn literal(&self, value: impl Into<Value>) -> SqmExpression {
        SqmExpression::Literal(SqmLiteral::new(self.next_id(), value.into()))
    }

    #[must_use]
    pub fn attribute(&self, path: NavigablePath, kind: ValueKind) -> SqmExpression {
        SqmExpression::AttributeReference(SqmAttributeReference::new(self.next_id(), path, kind))
    }

    #[must_use]
    pub fn named_parameter(
        &self,
        name: impl Into<String>,
        anticipated: Option<ValueKind>,
    ) -> SqmExpression {
        SqmExpression::Parameter(SqmParameter::new(
            self.next_id(),
            ParameterLabel::Named(name.into()),
            anticipated,
        ))
    }

    #[must_use]
    pub fn positional_parameter(
        &self,
        position: u32,
        anticipated: Option<ValueKind>,
    ) -> SqmExpression {
        SqmExpression::Parameter(SqmParameter::new(
            self.next_id(),
            ParameterLabel::Positional(position),
            anticipated,
        ))
    }

    #[must_use]
    pub fn anonymous_parameter(&self, anticipated: Option<ValueKind>) -> SqmExpression {
        SqmExpression::Parameter(SqmParameter::new(
            self.next_id(),
            ParameterLabel::Anonymous,
            anticipated,
        ))
    }

    /// A function call. `return_type` is the declared result type, if the
    /// function registry knows one.
    #[must_use]
    pub fn function(
        &self,
        name: impl Into<String>,
        arguments: Vec<SqmExpression>,
        return_type: Option<ValueKind>,
    ) -> SqmExpression {
        SqmExpression::Function(SqmFunction::new(
            self.next_id(),
            name.into(),
            arguments,
            return_type,
        ))
    }
}

///
/// TESTS
///
