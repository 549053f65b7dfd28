//! Handlers and preprocessors.
//!
//! A [`Handler`] is the terminal action of a route: an async function of the
//! derived [`MatchContext`]. The router only resolves handlers; invoking them
//! is up to the caller (see [`RouterService`](crate::RouterService)).
//!
//! Handlers may return `()` or `Result<(), E>`; errors are logged and
//! swallowed, the same way a failed reply would be.
//!
//! ```rust,ignore
//! router.hear("^ping$").handle(|ctx: MatchContext| async move {
//!     println!("pong for {:?}", ctx.message().user);
//! });
//!
//! router.hear("^deploy (?P<env>\\w+)$").handle(|ctx: MatchContext| async move {
//!     let env = ctx.capture("env").ok_or("no env")?;
//!     deploy(env).await
//! });
//! ```

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;
use tracing::error;

use chatroute_core::MatchContext;

// ============================================================================
// HandlerOutput
// ============================================================================

/// Return types a handler may produce.
pub trait HandlerOutput: Send + 'static {
    /// Consumes the handler's return value.
    fn finish(self);
}

impl HandlerOutput for () {
    fn finish(self) {}
}

impl<E: fmt::Display + Send + 'static> HandlerOutput for Result<(), E> {
    fn finish(self) {
        if let Err(e) = self {
            error!("Handler error: {e}");
        }
    }
}

// ============================================================================
// Handler
// ============================================================================

type HandlerFn = dyn Fn(MatchContext) -> BoxFuture<'static, ()> + Send + Sync;

/// A type-erased, cheaply cloneable route handler.
#[derive(Clone)]
pub struct Handler {
    inner: Arc<HandlerFn>,
}

impl Handler {
    /// Wraps an async function of the match context.
    pub fn new<F, Fut>(f: F) -> Self
    where
        F: Fn(MatchContext) -> Fut + Send + Sync + 'static,
        Fut: Future + Send + 'static,
        Fut::Output: HandlerOutput,
    {
        Self {
            inner: Arc::new(move |ctx: MatchContext| {
                let fut = f(ctx);
                async move { fut.await.finish() }.boxed()
            }),
        }
    }

    /// Invokes the handler with a derived context.
    pub fn call(&self, ctx: MatchContext) -> BoxFuture<'static, ()> {
        (self.inner)(ctx)
    }

    /// Returns `true` if both handles refer to the same handler.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler").finish_non_exhaustive()
    }
}

// ============================================================================
// Preprocessor
// ============================================================================

type PreprocessFn = dyn Fn(MatchContext) -> MatchContext + Send + Sync;

/// A context transform run before a route's matchers.
#[derive(Clone)]
pub struct Preprocessor {
    inner: Arc<PreprocessFn>,
}

impl Preprocessor {
    /// Wraps a context transform.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(MatchContext) -> MatchContext + Send + Sync + 'static,
    {
        Self { inner: Arc::new(f) }
    }

    /// Applies the transform.
    pub fn apply(&self, ctx: MatchContext) -> MatchContext {
        (self.inner)(ctx)
    }
}

impl fmt::Debug for Preprocessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Preprocessor").finish_non_exhaustive()
    }
}
