//! Tower service integration for routers.
//!
//! [`RouterService`] wraps a configured, shared [`Router`] and implements
//! `tower::Service<MatchContext>`: calling it dispatches synchronously and
//! then awaits the resolved handler. This lets tower middleware (timeouts,
//! concurrency limits, tracing layers) wrap handler execution.
//!
//! ```rust,ignore
//! use tower::ServiceBuilder;
//! use tower::timeout::TimeoutLayer;
//!
//! let service = ServiceBuilder::new()
//!     .layer(TimeoutLayer::new(Duration::from_secs(5)))
//!     .service(RouterService::new(router));
//! ```

use std::convert::Infallible;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures::future::BoxFuture;
use tower::Service;
use tracing::trace;

use chatroute_core::MatchContext;

use crate::router::Router;

/// The response of a [`RouterService`] call.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DispatchOutcome {
    /// Whether a route matched and its handler ran.
    pub matched: bool,
    /// The name of the leaf route that matched, if it has one.
    pub route: Option<String>,
}

/// A cheaply cloneable service that dispatches contexts through a router.
#[derive(Debug, Clone)]
pub struct RouterService {
    router: Arc<Router>,
}

impl RouterService {
    /// Freezes `router` and wraps it.
    pub fn new(router: Router) -> Self {
        Self::from_shared(Arc::new(router))
    }

    /// Wraps an already shared router.
    pub fn from_shared(router: Arc<Router>) -> Self {
        Self { router }
    }

    /// Returns the wrapped router.
    pub fn router(&self) -> &Arc<Router> {
        &self.router
    }
}

impl Service<MatchContext> for RouterService {
    type Response = DispatchOutcome;
    type Error = Infallible;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, ctx: MatchContext) -> Self::Future {
        let (matched, ctx) = self.router.dispatch(ctx);
        let resolved = matched.map(|m| (m.handler, m.route.get_name().map(str::to_owned)));

        Box::pin(async move {
            match resolved {
                Some((handler, route)) => {
                    trace!(route = route.as_deref().unwrap_or("unnamed"), "Invoking handler");
                    handler.call(ctx).await;
                    Ok(DispatchOutcome {
                        matched: true,
                        route,
                    })
                }
                None => Ok(DispatchOutcome::default()),
            }
        })
    }
}
