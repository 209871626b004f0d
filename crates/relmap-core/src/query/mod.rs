//! Semantic query model expressions.
//!
//! Expression trees are immutable once built. Translation logic walks them
//! through [`SemanticQueryWalker`]; adding a translation never touches the
//! node types.

mod expr;
mod node;
mod render;
mod resolve;
mod walker;

pub use expr::{
    ParameterLabel, SqmAttributeReference, SqmExpression, SqmFunction, SqmLiteral, SqmParameter,
    SqmStar,
};
pub use node::{NodeBuilder, NodeId};
pub use render::ExpressionRenderer;
pub use resolve::ExpressionTypeResolver;
pub use walker::SemanticQueryWalker;
