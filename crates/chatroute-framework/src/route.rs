//! A single rule in a route tree.
//!
//! A [`Route`] holds an ordered list of matchers (AND-combined), an optional
//! preprocessor, and either a terminal handler or a nested [`Router`].
//! Routes are created by registration calls on a router and configured by
//! chaining:
//!
//! ```rust,ignore
//! router
//!     .of_types([MessageType::DirectMention])
//!     .name("to-me")
//!     .subrouter(|tome| {
//!         tome.hear("^ping$").handle(pong);
//!         tome.hear("^help$").handle(help);
//!     });
//! ```
//!
//! # Deferred errors
//!
//! Configuration never fails immediately. The first error (an invalid
//! pattern, an empty type set) is recorded on the route and every later
//! configuration call is a no-op. Inspect it with [`Route::error`] or
//! [`Route::finish`], or validate a whole tree with [`Router::validate`].
//! A route holding an error never matches.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use tracing::{debug, trace};

use chatroute_core::{BoxedAgent, MatchContext, MessageEvent, MessageType};

use crate::error::{RouteError, RouteResult};
use crate::handler::{Handler, HandlerOutput, Preprocessor};
use crate::matcher::{BoxedMatcher, FnMatcher, Matcher, PatternMatcher, TypesMatcher};
use crate::router::Router;

/// Records which route matched and which leaf handler was selected.
///
/// When a route delegates to a subrouter, `route` is the leaf route inside
/// the subrouter, never the delegating one.
#[derive(Debug, Clone)]
pub struct RouteMatch<'r> {
    /// The leaf route that matched.
    pub route: &'r Route,
    /// The handler to invoke with the derived context.
    pub handler: Handler,
}

/// A route: matchers plus a handler or a subrouter.
#[derive(Default)]
pub struct Route {
    name: Option<String>,
    matchers: Vec<BoxedMatcher>,
    preprocessor: Option<Preprocessor>,
    handler: Option<Handler>,
    subrouter: Option<Router>,
    agent_id: String,
    error: Option<RouteError>,
}

impl Route {
    /// Creates an empty route.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty route that already knows the agent identity.
    pub(crate) fn with_identity(agent_id: &str) -> Self {
        Self {
            agent_id: agent_id.to_string(),
            ..Self::default()
        }
    }

    // ─── Builder surface ──────────────────────────────────────────────────────

    /// Sets a name used in log output.
    pub fn name(&mut self, name: impl Into<String>) -> &mut Self {
        if self.error.is_none() {
            self.name = Some(name.into());
        }
        self
    }

    /// Appends a pattern matcher over the message text.
    ///
    /// An invalid pattern records a build error.
    pub fn hear(&mut self, pattern: &str) -> &mut Self {
        if self.error.is_none() {
            match PatternMatcher::new(pattern) {
                Ok(matcher) => self.push_matcher(Box::new(matcher)),
                Err(e) => self.record(e),
            }
        }
        self
    }

    /// Appends a matcher satisfied by any of `types`.
    ///
    /// An empty type set records a build error.
    pub fn of_types(&mut self, types: impl IntoIterator<Item = MessageType>) -> &mut Self {
        if self.error.is_none() {
            match TypesMatcher::new(types) {
                Ok(matcher) => self.push_matcher(Box::new(matcher)),
                Err(e) => self.record(e),
            }
        }
        self
    }

    /// Appends a user-supplied matcher.
    pub fn add_matcher(&mut self, matcher: impl Matcher) -> &mut Self {
        if self.error.is_none() {
            self.push_matcher(Box::new(matcher));
        }
        self
    }

    /// Appends a predicate closure as a matcher.
    pub fn filter<F>(&mut self, check: F) -> &mut Self
    where
        F: Fn(&MatchContext) -> bool + Send + Sync + 'static,
    {
        self.add_matcher(FnMatcher::new(check))
    }

    /// Sets a context transform run before the matchers on every evaluation.
    pub fn preprocess<F>(&mut self, f: F) -> &mut Self
    where
        F: Fn(MatchContext) -> MatchContext + Send + Sync + 'static,
    {
        if self.error.is_none() {
            self.preprocessor = Some(Preprocessor::new(f));
        }
        self
    }

    /// Sets the terminal handler from an async function.
    pub fn handle<F, Fut>(&mut self, f: F) -> &mut Self
    where
        F: Fn(MatchContext) -> Fut + Send + Sync + 'static,
        Fut: Future + Send + 'static,
        Fut::Output: HandlerOutput,
    {
        self.handle_boxed(Handler::new(f))
    }

    /// Sets the terminal handler from a function of the derived context, the
    /// owning agent and the message.
    ///
    /// Shorthand for handlers that only need to reply to what they heard.
    pub fn handle_message<F, Fut>(&mut self, f: F) -> &mut Self
    where
        F: Fn(MatchContext, BoxedAgent, Arc<MessageEvent>) -> Fut + Send + Sync + 'static,
        Fut: Future + Send + 'static,
        Fut::Output: HandlerOutput,
    {
        self.handle(move |ctx: MatchContext| {
            let agent = Arc::clone(ctx.agent());
            let message = ctx.message_arc();
            f(ctx, agent, message)
        })
    }

    /// Sets a pre-built handler.
    pub fn handle_boxed(&mut self, handler: Handler) -> &mut Self {
        if self.error.is_none() {
            self.handler = Some(handler);
        }
        self
    }

    /// Attaches a new, empty subrouter and passes it to `configure`.
    ///
    /// Once attached, a match on this route is delegated entirely to the
    /// subrouter and this route's own handler is never invoked. Calling this
    /// again replaces the previous subrouter.
    pub fn subrouter<F>(&mut self, configure: F) -> &mut Self
    where
        F: FnOnce(&mut Router),
    {
        if self.error.is_none() {
            let mut router = Router::with_identity(&self.agent_id);
            configure(&mut router);
            self.subrouter = Some(router);
        }
        self
    }

    /// Propagates the agent identity to this route's matchers.
    ///
    /// The subrouter, if any, is not touched: its owning [`Router`] drives
    /// that.
    pub fn set_identity(&mut self, agent_id: &str) {
        self.agent_id = agent_id.to_string();
        for matcher in &mut self.matchers {
            matcher.set_identity(agent_id);
        }
    }

    // ─── Inspection ───────────────────────────────────────────────────────────

    /// Returns the recorded build error, if any.
    pub fn error(&self) -> Option<&RouteError> {
        self.error.as_ref()
    }

    /// Finishes configuration, surfacing the recorded build error.
    pub fn finish(&self) -> RouteResult<&Self> {
        match &self.error {
            Some(e) => Err(e.clone()),
            None => Ok(self),
        }
    }

    /// Returns the route name, if set.
    pub fn get_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns the number of matchers on this route.
    pub fn matcher_count(&self) -> usize {
        self.matchers.len()
    }

    /// Returns the handler, if set.
    pub fn handler(&self) -> Option<&Handler> {
        self.handler.as_ref()
    }

    /// Returns the subrouter, if attached.
    pub fn get_subrouter(&self) -> Option<&Router> {
        self.subrouter.as_ref()
    }

    pub(crate) fn subrouter_mut(&mut self) -> Option<&mut Router> {
        self.subrouter.as_mut()
    }

    // ─── Matching ─────────────────────────────────────────────────────────────

    /// Tests this route against `ctx`.
    ///
    /// Returns the resolved match (if any) together with the context as it
    /// stood when evaluation stopped.
    pub fn matches(&self, ctx: MatchContext) -> (Option<RouteMatch<'_>>, MatchContext) {
        let name = self.display_name();

        if let Some(e) = &self.error {
            debug!(route = name, error = %e, "Route has a build error, skipping");
            return (None, ctx);
        }

        let mut ctx = match &self.preprocessor {
            Some(pre) => pre.apply(ctx),
            None => ctx,
        };

        for (index, matcher) in self.matchers.iter().enumerate() {
            let outcome = matcher.matches(ctx);
            ctx = outcome.context;
            if !outcome.matched {
                trace!(route = name, matcher_index = index, "Matcher failed");
                return (None, ctx);
            }
        }

        if let Some(router) = &self.subrouter {
            trace!(route = name, "Delegating to subrouter");
            return router.dispatch(ctx);
        }

        match &self.handler {
            Some(handler) => {
                trace!(route = name, "Route matched");
                let matched = RouteMatch {
                    route: self,
                    handler: handler.clone(),
                };
                (Some(matched), ctx)
            }
            None => {
                trace!(route = name, "Route matched but has no handler");
                (None, ctx)
            }
        }
    }

    // ─── Internals ────────────────────────────────────────────────────────────

    pub(crate) fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("unnamed")
    }

    fn push_matcher(&mut self, mut matcher: BoxedMatcher) {
        if !self.agent_id.is_empty() {
            matcher.set_identity(&self.agent_id);
        }
        self.matchers.push(matcher);
    }

    fn record(&mut self, error: RouteError) {
        if self.error.is_none() {
            self.error = Some(error);
        }
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("name", &self.name)
            .field("matchers", &self.matchers)
            .field("has_preprocessor", &self.preprocessor.is_some())
            .field("has_handler", &self.handler.is_some())
            .field("subrouter", &self.subrouter)
            .field("error", &self.error)
            .finish()
    }
}
