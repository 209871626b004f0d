//! Core runtime for relmap: persistent collection descriptors, collection
//! result initialization, semantic query expressions, and the ergonomics
//! exported via the `prelude`.
#![warn(unreachable_pub)]

// public exports are one module level down
pub mod collection;
pub mod error;
pub mod model;
pub mod obs;
pub mod query;
pub mod registry;
pub mod result;
pub mod session;
pub mod traits;
pub mod value;

// test
#[cfg(test)]
pub(crate) mod test_fixtures;

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
/// No errors, sinks, or result plumbing are re-exported here.
///

pub mod prelude {
    pub use crate::{
        collection::{
            Element, FieldAccess, PersistentCollection, PersistentCollectionDescriptor,
            PersistentList, PersistentListDescriptor,
        },
        model::{BootCollection, BootElement, BootIndex, BootProperty, BootValue, NavigablePath},
        query::{NodeBuilder, SemanticQueryWalker, SqmExpression},
        traits::{ElementValue, Path},
        value::{Value, ValueKind},
    };
}
