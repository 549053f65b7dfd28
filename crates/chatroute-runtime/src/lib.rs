//! chatroute Runtime: configuration, logging and the serving harness.
//!
//! - Layered configuration through figment ([`config`])
//! - Subscriber setup through `tracing-subscriber` ([`logging`])
//! - [`AgentRuntime`], which binds a [`Router`](chatroute_framework::Router)
//!   to its agent and routes inbound messages
//!
//! ```ignore
//! use chatroute_runtime::AgentRuntime;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let runtime = AgentRuntime::builder().build(router)?;
//!     let summary = runtime.serve(rx).await;
//!     Ok(())
//! }
//! ```

pub mod agent;
pub mod config;
pub mod error;
pub mod logging;
pub mod runtime;

pub use agent::ConfiguredAgent;
pub use config::{ChatrouteConfig, ConfigError, ConfigLoader, ConfigResult};
pub use error::{RuntimeError, RuntimeResult};
pub use logging::{LoggingBuilder, SpanEvents};
pub use runtime::{AgentRuntime, RuntimeBuilder, ServeSummary};

pub use tracing;

/// Logging macros for handler code.
pub mod prelude {
    pub use tracing::{Level, debug, error, info, instrument, span, trace, warn};
}
