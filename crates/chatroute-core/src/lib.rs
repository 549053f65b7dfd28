//! # chatroute Core
//!
//! Foundation types shared by every chatroute layer:
//!
//! - **Agent**: the identity of the chat agent that owns a router ([`Agent`])
//! - **Message**: the platform-neutral inbound message shape ([`MessageEvent`])
//! - **Match context**: the immutable carrier threaded through a match
//!   attempt ([`MatchContext`])
//! - **Classification**: pure predicates over messages
//!   ([`is_direct_message`], [`is_direct_mention`], [`strip_direct_mention`])
//!
//! Nothing in this crate performs I/O.

pub mod agent;
pub mod classify;
pub mod context;
pub mod message;

pub use agent::{Agent, BoxedAgent};
pub use classify::{is_direct_mention, is_direct_message, strip_direct_mention};
pub use context::{Captures, MatchContext};
pub use message::{ChannelKind, MessageEvent, MessageType};
