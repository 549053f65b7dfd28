//! Agent trait.
//!
//! An [`Agent`] is the chat participant a router serves. The routing core only
//! needs its platform identity; concrete agents (a Slack client, a test double)
//! can be recovered in handlers through [`Agent::as_any`].

use std::any::Any;
use std::fmt::Debug;
use std::sync::Arc;

/// The owning agent of a router.
pub trait Agent: Debug + Send + Sync + 'static {
    /// Returns the agent's user identifier on the platform.
    ///
    /// This is the value mention tokens are compared against.
    fn id(&self) -> &str;

    /// Returns a human-readable name, defaulting to the identifier.
    fn name(&self) -> &str {
        self.id()
    }

    /// Upcasts to `Any` so handlers can downcast to the concrete agent type.
    fn as_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

/// Type alias for a shared agent reference.
pub type BoxedAgent = Arc<dyn Agent>;
