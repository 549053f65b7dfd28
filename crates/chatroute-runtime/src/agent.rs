//! An [`Agent`] built from configuration.

use std::any::Any;
use std::sync::Arc;

use chatroute_core::Agent;

use crate::config::AgentConfig;

/// An agent known only by its configured identity.
///
/// Platform integrations usually provide their own [`Agent`]; this one is
/// enough for processes whose handlers reply through some other channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfiguredAgent {
    id: String,
    name: Option<String>,
}

impl ConfiguredAgent {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn from_config(config: &AgentConfig) -> Self {
        Self {
            id: config.id.clone(),
            name: config.name.clone(),
        }
    }
}

impl Agent for ConfiguredAgent {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }

    fn as_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}
