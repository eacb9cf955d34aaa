use crate::command::Command;
use crate::container::ScopedResolver;
use crate::error::{DispatchError, Result};
use crate::event::{CliEvent, EventKind};
use std::sync::Arc;

/// A unit contributing commands, queried once per event for relevance.
///
/// `listeners_for_event` must answer `Ok(vec![])` for event kinds the module
/// does not handle. An `Err` means the module is miswired and is not
/// recoverable per event.
pub trait Module: Send + Sync {
    fn name(&self) -> &str;

    fn listeners_for_event(&self, event: &CliEvent) -> Result<Vec<Arc<dyn Command>>>;
}

/// Module whose commands live in the container and are resolved on demand.
#[derive(Debug, Clone)]
pub struct ContainerModule {
    name: String,
    resolver: ScopedResolver,
    handles: Vec<EventKind>,
}

impl ContainerModule {
    /// Answers argv dispatch and describe requests.
    pub fn new(name: impl Into<String>, resolver: ScopedResolver) -> Self {
        Self {
            name: name.into(),
            resolver,
            handles: vec![EventKind::DispatchedArgv, EventKind::Describe],
        }
    }

    pub fn handling(mut self, kinds: &[EventKind]) -> Self {
        self.handles = kinds.to_vec();
        self
    }

    pub fn command_ids(&self) -> &[String] {
        self.resolver.ids()
    }
}

impl Module for ContainerModule {
    fn name(&self) -> &str {
        &self.name
    }

    fn listeners_for_event(&self, event: &CliEvent) -> Result<Vec<Arc<dyn Command>>> {
        if !self.handles.contains(&event.kind()) {
            return Ok(Vec::new());
        }
        self.resolver
            .resolve_all()
            .map_err(|source| DispatchError::Resolution {
                module: self.name.clone(),
                source,
            })
    }
}
