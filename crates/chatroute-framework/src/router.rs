//! Ordered route collections and dispatch.
//!
//! A [`Router`] tries its routes in registration order and stops at the first
//! one whose matcher chain (and, recursively, subrouter chain) succeeds.
//! There is no priority or specificity ranking: registration order is the
//! precedence.
//!
//! ```rust,ignore
//! let mut router = Router::new();
//! router.hear("^ping$").handle(pong);
//! router.hear(".*").handle(fallback);
//!
//! router.set_identity("U024BE7LH");
//! router.validate()?;
//!
//! let (matched, ctx) = router.dispatch(MatchContext::new(agent, message));
//! if let Some(m) = matched {
//!     m.handler.call(ctx).await;
//! }
//! ```
//!
//! # Thread Safety
//!
//! Registration and [`set_identity`](Router::set_identity) take `&mut self`;
//! [`dispatch`](Router::dispatch) takes `&self`. Configure fully, then share
//! the router (for example behind an `Arc`) to serve.

use std::fmt;
use std::future::Future;

use tracing::debug;

use chatroute_core::{MatchContext, MessageType};

use crate::error::{RouteError, RouteResult};
use crate::handler::HandlerOutput;
use crate::matcher::Matcher;
use crate::route::{Route, RouteMatch};

/// An ordered collection of routes.
#[derive(Default)]
pub struct Router {
    routes: Vec<Route>,
    agent_id: String,
}

impl Router {
    /// Creates an empty router.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_identity(agent_id: &str) -> Self {
        Self {
            routes: Vec::new(),
            agent_id: agent_id.to_string(),
        }
    }

    // ─── Registration ─────────────────────────────────────────────────────────

    /// Appends a new, empty route and returns it for configuration.
    pub fn route(&mut self) -> &mut Route {
        let index = self.routes.len();
        self.routes.push(Route::with_identity(&self.agent_id));
        &mut self.routes[index]
    }

    /// Appends a route hearing `pattern`.
    pub fn hear(&mut self, pattern: &str) -> &mut Route {
        self.route().hear(pattern)
    }

    /// Appends a route matching any of `types`.
    pub fn of_types(&mut self, types: impl IntoIterator<Item = MessageType>) -> &mut Route {
        self.route().of_types(types)
    }

    /// Appends a route with a user-supplied matcher.
    pub fn add_matcher(&mut self, matcher: impl Matcher) -> &mut Route {
        self.route().add_matcher(matcher)
    }

    /// Appends a route with a predicate closure.
    pub fn filter<F>(&mut self, check: F) -> &mut Route
    where
        F: Fn(&MatchContext) -> bool + Send + Sync + 'static,
    {
        self.route().filter(check)
    }

    /// Appends a route with a preprocessor.
    pub fn preprocess<F>(&mut self, f: F) -> &mut Route
    where
        F: Fn(MatchContext) -> MatchContext + Send + Sync + 'static,
    {
        self.route().preprocess(f)
    }

    /// Appends a catch-all route with a handler.
    pub fn handle<F, Fut>(&mut self, f: F) -> &mut Route
    where
        F: Fn(MatchContext) -> Fut + Send + Sync + 'static,
        Fut: Future + Send + 'static,
        Fut::Output: HandlerOutput,
    {
        self.route().handle(f)
    }

    /// Propagates the agent identity to every route and, recursively, every
    /// subrouter.
    ///
    /// Call once, after registration and before serving.
    pub fn set_identity(&mut self, agent_id: &str) {
        self.agent_id = agent_id.to_string();
        for route in &mut self.routes {
            route.set_identity(agent_id);
            if let Some(subrouter) = route.subrouter_mut() {
                subrouter.set_identity(agent_id);
            }
        }
    }

    /// Checks the whole tree for build errors.
    ///
    /// Returns the first recorded route error in depth-first registration
    /// order, or [`RouteError::MissingHandler`] for a leaf route that can
    /// never resolve a handler.
    pub fn validate(&self) -> RouteResult<()> {
        for route in &self.routes {
            route.finish()?;
            match route.get_subrouter() {
                Some(subrouter) => subrouter.validate()?,
                None if route.handler().is_none() => {
                    return Err(RouteError::MissingHandler {
                        route: route.display_name().to_string(),
                    });
                }
                None => {}
            }
        }
        Ok(())
    }

    // ─── Inspection ───────────────────────────────────────────────────────────

    /// Returns the registered routes in order.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Returns the number of registered routes.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Returns `true` if no routes are registered.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    // ─── Dispatch ─────────────────────────────────────────────────────────────

    /// Finds the first route matching `ctx`.
    ///
    /// On a match, returns the leaf route and handler together with the
    /// context derived along the way. Otherwise returns `None` and the input
    /// context unchanged; contexts derived by failing routes are discarded.
    pub fn dispatch(&self, ctx: MatchContext) -> (Option<RouteMatch<'_>>, MatchContext) {
        for (index, route) in self.routes.iter().enumerate() {
            let (matched, derived) = route.matches(ctx.clone());
            if let Some(matched) = matched {
                debug!(
                    route = matched.route.display_name(),
                    route_index = index,
                    "Route resolved"
                );
                return (Some(matched), derived);
            }
        }
        (None, ctx)
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("agent_id", &self.agent_id)
            .field("routes", &self.routes)
            .finish()
    }
}
