//! # chatroute Framework
//!
//! The route tree and dispatch engine:
//!
//! - Matcher system: [`Matcher`] with [`PatternMatcher`], [`TypesMatcher`]
//!   and [`FnMatcher`]
//! - [`Route`]: AND-combined matchers, an optional preprocessor, and a
//!   handler or a nested [`Router`]
//! - [`Router`]: ordered, first-match-wins dispatch
//! - [`RouterService`]: tower integration that runs the resolved handler
//!
//! Dispatch itself is synchronous and performs no I/O; handlers are async
//! and are awaited by the caller.
//!
//! ```rust,ignore
//! use chatroute_framework::Router;
//! use chatroute_core::MessageType;
//!
//! let mut router = Router::new();
//! router
//!     .of_types([MessageType::DirectMention])
//!     .subrouter(|tome| {
//!         tome.hear("^ping$").handle(pong);
//!     });
//! router.set_identity(agent.id());
//! router.validate()?;
//! ```

pub mod error;
pub mod handler;
pub mod matcher;
pub mod route;
pub mod router;
pub mod service;

#[cfg(test)]
mod testing;

pub use error::{RouteError, RouteResult};
pub use handler::{Handler, HandlerOutput, Preprocessor};
pub use matcher::{BoxedMatcher, FnMatcher, MatchOutcome, Matcher, PatternMatcher, TypesMatcher};
pub use route::{Route, RouteMatch};
pub use router::Router;
pub use service::{DispatchOutcome, RouterService};
