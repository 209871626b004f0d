//! Mapping-build tracing boundary.
//!
//! Tracing is optional, injected through the creation context, and must not
//! affect what gets built.

///
/// TraceSink
///

pub trait TraceSink: Send + Sync {
    fn on_event(&self, event: TraceEvent);
}

///
/// TraceEvent
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TraceEvent {
    DescriptorBuilt {
        role: String,
        has_index_formula: bool,
        index_base: i64,
    },
    AttributeCreated {
        role: String,
        attribute: String,
    },
    DescriptorRegistered {
        role: String,
    },
}
