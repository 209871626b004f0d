//! Mapping-model inputs and shared addressing.
//!
//! - `boot` is the configuration-time mapping a descriptor is built from
//! - `navigable` addresses positions in the object graph
//! - `managed` carries the owning type and the creation context
//!
//! Boot mappings are read once while the runtime model is built and are not
//! consulted afterwards.
pub mod boot;
pub mod managed;
pub mod navigable;

pub use boot::{
    BootCollection, BootElement, BootElementNature, BootIndex, BootProperty, BootValue,
    CollectionClassification, SelectionSource,
};
pub use managed::{ManagedKind, ManagedTypeDescriptor, RuntimeModelCreationContext};
pub use navigable::NavigablePath;
