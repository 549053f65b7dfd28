//! # chatroute
//!
//! Composable, first-match message routing for chat agents.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐     ┌──────────────────────────────────────────────┐
//! │ AgentRuntime │────▶│ Router                                       │
//! │ (config,     │     │  Route: matchers → preprocess → handler      │
//! │  logging)    │     │  Route: matchers → preprocess → Router ...   │
//! └──────────────┘     └──────────────────────────────────────────────┘
//! ```
//!
//! - **Core**: messages, message types, the immutable [`MatchContext`](core::MatchContext)
//!   and mention classification
//! - **Framework**: matchers, routes, routers and the tower service
//! - **Runtime**: layered configuration, logging and the serving loop
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use chatroute::prelude::*;
//!
//! async fn pong(ctx: MatchContext) {
//!     println!("pong to {:?}", ctx.message().user);
//! }
//!
//! let mut router = Router::new();
//! router
//!     .of_types([MessageType::DirectMention, MessageType::DirectMessage])
//!     .subrouter(|tome| {
//!         tome.hear("^ping$").handle(pong);
//!     });
//!
//! let runtime = AgentRuntime::builder().build(router)?;
//! runtime.serve(rx).await;
//! ```
//!
//! ## Features
//!
//! - `toml-config` *(default)*: TOML configuration files
//! - `yaml-config`: YAML configuration files
//! - `json-log`: JSON log output

pub use chatroute_core as core;
pub use chatroute_framework as framework;
pub use chatroute_runtime as runtime;

/// Commonly used types for building an agent.
///
/// ```rust,ignore
/// use chatroute::prelude::*;
/// ```
pub mod prelude {
    // Runtime
    pub use chatroute_runtime::config::{ChatrouteConfig, ConfigLoader};
    pub use chatroute_runtime::{AgentRuntime, ConfiguredAgent, RuntimeError};

    // Routing
    pub use chatroute_framework::{
        DispatchOutcome, FnMatcher, MatchOutcome, Matcher, PatternMatcher, Route, RouteError,
        Router, RouterService, TypesMatcher,
    };

    // Messages and context
    pub use chatroute_core::{
        Agent, BoxedAgent, ChannelKind, MatchContext, MessageEvent, MessageType,
        is_direct_mention, is_direct_message, strip_direct_mention,
    };

    pub use chatroute_runtime::prelude::*;
}
