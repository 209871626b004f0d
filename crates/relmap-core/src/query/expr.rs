use crate::{
    model::NavigablePath,
    query::{node::NodeId, walker::SemanticQueryWalker},
    value::{Value, ValueKind},
};
use std::fmt;

///
/// SqmStar
///
/// The `*` wildcard. Has no children and no declared type; its meaning is
/// decided by the consumer, as in `count(*)`.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SqmStar {
    id: NodeId,
}

impl SqmStar {
    pub(crate) const fn new(id: NodeId) -> Self {
        Self { id }
    }

    #[must_use]
    pub const fn id(&self) -> NodeId {
        self.id
    }

    /// Always `None`.
    #[must_use]
    pub const fn expressable_type(&self) -> Option<ValueKind> {
        None
    }

    pub fn accept<W: SemanticQueryWalker + ?Sized>(&self, walker: &mut W) -> W::Output {
        walker.visit_star(self)
    }
}

///
/// SqmLiteral
///

#[derive(Clone, Debug, PartialEq)]
pub struct SqmLiteral {
    id: NodeId,
    value: Value,
}

impl SqmLiteral {
    pub(crate) const fn new(id: NodeId, value: Value) -> Self {
        Self { id, value }
    }

    #[must_use]
    pub const fn id(&self) -> NodeId {
        self.id
    }

    #[must_use]
    pub const fn value(&self) -> &Value {
        &self.value
    }

    /// `None` for a null literal.
    #[must_use]
    pub fn expressable_type(&self) -> Option<ValueKind> {
        self.value.kind()
    }

    pub fn accept<W: SemanticQueryWalker + ?Sized>(&self, walker: &mut W) -> W::Output {
        walker.visit_literal(self)
    }
}

///
/// SqmAttributeReference
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SqmAttributeReference {
    id: NodeId,
    path: NavigablePath,
    kind: ValueKind,
}

impl SqmAttributeReference {
    pub(crate) const fn new(id: NodeId, path: NavigablePath, kind: ValueKind) -> Self {
        Self { id, path, kind }
    }

    #[must_use]
    pub const fn id(&self) -> NodeId {
        self.id
    }

    #[must_use]
    pub const fn path(&self) -> &NavigablePath {
        &self.path
    }

    #[must_use]
    pub const fn expressable_type(&self) -> Option<ValueKind> {
        Some(self.kind)
    }

    pub fn accept<W: SemanticQueryWalker + ?Sized>(&self, walker: &mut W) -> W::Output {
        walker.visit_attribute_reference(self)
    }
}

///
/// ParameterLabel
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ParameterLabel {
    Named(String),
    Positional(u32),
    Anonymous,
}

impl fmt::Display for ParameterLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => write!(f, ":{name}"),
            Self::Positional(position) => write!(f, "?{position}"),
            Self::Anonymous => f.write_str("?"),
        }
    }
}

///
/// SqmParameter
/// A bind parameter; its type is the one anticipated from context, if any.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SqmParameter {
    id: NodeId,
    label: ParameterLabel,
    anticipated: Option<ValueKind>,
}

impl SqmParameter {
    pub(crate) const fn new(
        id: NodeId,
        label: ParameterLabel,
        anticipated: Option<ValueKind>,
    ) -> Self {
        Self {
            id,
            label,
            anticipated,
        }
    }

    #[must_use]
    pub const fn id(&self) -> NodeId {
        self.id
    }

    #[must_use]
    pub const fn label(&self) -> &ParameterLabel {
        &self.label
    }

    #[must_use]
    pub const fn expressable_type(&self) -> Option<ValueKind> {
        self.anticipated
    }

    pub fn accept<W: SemanticQueryWalker + ?Sized>(&self, walker: &mut W) -> W::Output {
        walker.visit_parameter(self)
    }
}

///
/// SqmFunction
///

#[derive(Clone, Debug, PartialEq)]
pub struct SqmFunction {
    id: NodeId,
    name: String,
    arguments: Vec<SqmExpression>,
    return_type: Option<ValueKind>,
}

impl SqmFunction {
    pub(crate) const fn new(
        id: NodeId,
        name: String,
        arguments: Vec<SqmExpression>,
        return_type: Option<ValueKind>,
    ) -> Self {
        Self {
            id,
            name,
            arguments,
            return_type,
        }
    }

    #[must_use]
    pub const fn id(&self) -> NodeId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn arguments(&self) -> &[SqmExpression] {
        &self.arguments
    }

    /// Declared return type; walkers may resolve a more specific one.
    #[must_use]
    pub const fn expressable_type(&self) -> Option<ValueKind> {
        self.return_type
    }

    pub fn accept<W: SemanticQueryWalker + ?Sized>(&self, walker: &mut W) -> W::Output {
        walker.visit_function(self)
    }
}

///
/// SqmExpression
///
/// Closed set of expression nodes. `accept` dispatches each variant to the
/// matching walker method.
///

#[derive(Clone, Debug, PartialEq)]
pub enum SqmExpression {
    Star(SqmStar),
    Literal(SqmLiteral),
    AttributeReference(SqmAttributeReference),
    Parameter(SqmParameter),
    Function(SqmFunction),
}

impl SqmExpression {
    pub fn accept<W: SemanticQueryWalker + ?Sized>(&self, walker: &mut W) -> W::Output {
        match self {
            Self::Star(node) => node.accept(walker),
            Self::Literal(node) => node.accept(walker),
            Self::AttributeReference(node) => node.accept(walker),
            Self::Parameter(node) => node.accept(walker),
            Self::Function(node) => node.accept(walker),
        }
    }

    #[must_use]
    pub const fn node_id(&self) -> NodeId {
        match self {
            Self::Star(node) => node.id(),
            Self::Literal(node) => node.id(),
            Self::AttributeReference(node) => node.id(),
            Self::Parameter(node) => node.id(),
            Self::Function(node) => node.id(),
        }
    }

    /// Declared type of the node, without contextual resolution.
    #[must_use]
    pub fn expressable_type(&self) -> Option<ValueKind> {
        match self {
            Self::Star(node) => node.expressable_type(),
            Self::Literal(node) => node.expressable_type(),
            Self::AttributeReference(node) => node.expressable_type(),
            Self::Parameter(node) => node.expressable_type(),
            Self::Function(node) => node.expressable_type(),
        }
    }

    #[must_use]
    pub const fn is_star(&self) -> bool {
        matches!(self, Self::Star(_))
    }
}
