//! Match context for the routing core.
//!
//! A [`MatchContext`] travels through one match attempt. It is a value: every
//! preprocessor and matcher receives a context and returns a (possibly new)
//! one, and callers must keep using the returned value. All fields sit behind
//! `Arc`, so deriving a context is a handful of reference-count bumps.
//!
//! The three pieces of state are reachable only through typed accessors:
//!
//! | state          | read              | derive                  |
//! |----------------|-------------------|-------------------------|
//! | agent          | [`agent`]         | [`with_agent`]          |
//! | message        | [`message`]       | [`with_message`]        |
//! | named captures | [`captures`]      | [`with_captures`]       |
//!
//! [`agent`]: MatchContext::agent
//! [`with_agent`]: MatchContext::with_agent
//! [`message`]: MatchContext::message
//! [`with_message`]: MatchContext::with_message
//! [`captures`]: MatchContext::captures
//! [`with_captures`]: MatchContext::with_captures

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::agent::BoxedAgent;
use crate::message::MessageEvent;

/// Named capture group values, keyed by group name.
pub type Captures = BTreeMap<String, String>;

/// The immutable carrier of agent, message and captures during dispatch.
#[derive(Debug, Clone)]
pub struct MatchContext {
    agent: BoxedAgent,
    message: Arc<MessageEvent>,
    captures: Arc<Captures>,
}

impl MatchContext {
    /// Creates the initial context for one dispatch.
    ///
    /// A context always holds an agent and a message; captures start empty.
    pub fn new(agent: BoxedAgent, message: impl Into<Arc<MessageEvent>>) -> Self {
        Self {
            agent,
            message: message.into(),
            captures: Arc::new(Captures::new()),
        }
    }

    /// Returns the owning agent.
    pub fn agent(&self) -> &BoxedAgent {
        &self.agent
    }

    /// Returns the current message.
    pub fn message(&self) -> &MessageEvent {
        &self.message
    }

    /// Returns the current message as a shared handle.
    pub fn message_arc(&self) -> Arc<MessageEvent> {
        Arc::clone(&self.message)
    }

    /// Returns the named captures gathered so far.
    pub fn captures(&self) -> &Captures {
        &self.captures
    }

    /// Returns a single named capture, if present.
    pub fn capture(&self, name: &str) -> Option<&str> {
        self.captures.get(name).map(String::as_str)
    }

    /// Derives a context with a different agent.
    pub fn with_agent(&self, agent: BoxedAgent) -> Self {
        Self {
            agent,
            ..self.clone()
        }
    }

    /// Derives a context with a different message.
    pub fn with_message(&self, message: impl Into<Arc<MessageEvent>>) -> Self {
        Self {
            message: message.into(),
            ..self.clone()
        }
    }

    /// Derives a context whose captures are replaced by `captures`.
    pub fn with_captures(&self, captures: Captures) -> Self {
        Self {
            captures: Arc::new(captures),
            ..self.clone()
        }
    }

    /// Derives a context with `extra` merged over the existing captures.
    ///
    /// Entries in `extra` overwrite existing entries of the same name.
    pub fn merge_captures<I, K, V>(&self, extra: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut captures = (*self.captures).clone();
        captures.extend(extra.into_iter().map(|(k, v)| (k.into(), v.into())));
        self.with_captures(captures)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::Agent;
    use std::any::Any;

    #[derive(Debug)]
    struct TestAgent(&'static str);

    impl Agent for TestAgent {
        fn id(&self) -> &str {
            self.0
        }

        fn as_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
            self
        }
    }

    fn ctx(text: &str) -> MatchContext {
        MatchContext::new(Arc::new(TestAgent("U1")), MessageEvent::new("C1", text))
    }

    #[test]
    fn test_new_context() {
        let ctx = ctx("hello");
        assert_eq!(ctx.agent().id(), "U1");
        assert_eq!(ctx.message().text, "hello");
        assert!(ctx.captures().is_empty());
    }

    #[test]
    fn test_derive_does_not_mutate_source() {
        let base = ctx("hello");
        let derived = base.with_message(MessageEvent::new("C1", "bye"));
        assert_eq!(base.message().text, "hello");
        assert_eq!(derived.message().text, "bye");

        let swapped = base.with_agent(Arc::new(TestAgent("U2")));
        assert_eq!(base.agent().id(), "U1");
        assert_eq!(swapped.agent().id(), "U2");
    }

    #[test]
    fn test_captures_merge() {
        let base = ctx("hello").merge_captures([("a", "1"), ("b", "2")]);
        let merged = base.merge_captures([("b", "3")]);
        assert_eq!(base.capture("b"), Some("2"));
        assert_eq!(merged.capture("a"), Some("1"));
        assert_eq!(merged.capture("b"), Some("3"));
        assert_eq!(merged.capture("c"), None);
    }

    #[test]
    fn test_with_captures_replaces() {
        let base = ctx("hello").merge_captures([("a", "1")]);
        let mut fresh = Captures::new();
        fresh.insert("z".into(), "26".into());
        let replaced = base.with_captures(fresh);
        assert_eq!(replaced.capture("a"), None);
        assert_eq!(replaced.capture("z"), Some("26"));
    }

    #[test]
    fn test_agent_downcast() {
        let ctx = ctx("hello");
        let any = Arc::clone(ctx.agent()).as_any();
        let agent = any.downcast::<TestAgent>().unwrap();
        assert_eq!(agent.0, "U1");
    }
}
