use crate::obs::trace::{TraceEvent, TraceSink};
use relmap_config::RelmapConfig;
use std::sync::Arc;

///
/// ManagedTypeDescriptor
/// Runtime description of the type that owns a mapped attribute.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ManagedTypeDescriptor {
    pub type_name: &'static str,
    pub kind: ManagedKind,
}

impl ManagedTypeDescriptor {
    #[must_use]
    pub const fn entity(type_name: &'static str) -> Self {
        Self {
            type_name,
            kind: ManagedKind::Entity,
        }
    }

    #[must_use]
    pub const fn embeddable(type_name: &'static str) -> Self {
        Self {
            type_name,
            kind: ManagedKind::Embeddable,
        }
    }
}

///
/// ManagedKind
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ManagedKind {
    Entity,
    Embeddable,
}

///
/// RuntimeModelCreationContext
///
/// Inputs shared by every descriptor built for one mapping model.
/// Tracing is optional, injected by the caller, and must not affect
/// what gets built.
///

#[derive(Clone, Default)]
pub struct RuntimeModelCreationContext {
    config: RelmapConfig,
    trace: Option<Arc<dyn TraceSink>>,
}

impl RuntimeModelCreationContext {
    #[must_use]
    pub fn new(config: RelmapConfig) -> Self {
        Self {
            config,
            trace: None,
        }
    }

    #[must_use]
    pub fn with_trace_sink(mut self, sink: Arc<dyn TraceSink>) -> Self {
        self.trace = Some(sink);
        self
    }

    #[must_use]
    pub const fn config(&self) -> &RelmapConfig {
        &self.config
    }

    pub(crate) fn trace(&self, event: TraceEvent) {
        if let Some(sink) = &self.trace {
            sink.on_event(event);
        }
    }
}

impl std::fmt::Debug for RuntimeModelCreationContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuntimeModelCreationContext")
            .field("config", &self.config)
            .field("trace", &self.trace.is_some())
            .finish()
    }
}
