//! Matcher system for the routing engine.
//!
//! A [`Matcher`] answers one question about a [`MatchContext`]: does it
//! satisfy my predicate, and what context results? Routes AND their matchers
//! together in registration order.
//!
//! Built-in matchers:
//!
//! - [`PatternMatcher`]: regular expression over the message text, with a
//!   leading mention of the agent stripped first
//! - [`TypesMatcher`]: message classification, OR over its configured
//!   [`MessageType`]s
//! - [`FnMatcher`]: an arbitrary predicate closure
//!
//! Matchers never fail with an error. Anything that can be wrong with a
//! matcher (an invalid pattern) is rejected when the route is built.

use std::fmt;

use regex::Regex;
use tracing::trace;

use chatroute_core::{
    MatchContext, MessageType, is_direct_mention, is_direct_message, strip_direct_mention,
};

use crate::error::{RouteError, RouteResult};

// ============================================================================
// Matcher Trait
// ============================================================================

/// The result of testing one matcher against a context.
#[derive(Debug, Clone)]
pub struct MatchOutcome {
    /// Whether the predicate held.
    pub matched: bool,
    /// The context to continue with, derived or unchanged.
    pub context: MatchContext,
}

impl MatchOutcome {
    /// A successful match continuing with `context`.
    pub fn hit(context: MatchContext) -> Self {
        Self {
            matched: true,
            context,
        }
    }

    /// A failed match continuing with `context`.
    pub fn miss(context: MatchContext) -> Self {
        Self {
            matched: false,
            context,
        }
    }

    fn from_bool(matched: bool, context: MatchContext) -> Self {
        Self { matched, context }
    }
}

/// A predicate tested against a match context.
///
/// `set_identity` is called with the agent's platform identifier before the
/// router starts serving, and never while a match is in flight.
pub trait Matcher: fmt::Debug + Send + Sync + 'static {
    /// Tests the context, returning the outcome and the context to continue
    /// with.
    fn matches(&self, ctx: MatchContext) -> MatchOutcome;

    /// Configures identity-dependent behaviour. Must be idempotent.
    fn set_identity(&mut self, _agent_id: &str) {}
}

/// Type alias for a boxed matcher.
pub type BoxedMatcher = Box<dyn Matcher>;

// ============================================================================
// Pattern Matcher
// ============================================================================

/// Matches the message text against a regular expression.
///
/// The search is unanchored; use `^` and `$` for whole-text matches. A
/// leading mention of the agent is stripped before matching, so `^ping$`
/// matches both `ping` and `@agent ping`.
///
/// If the pattern has named groups, their values are merged into the
/// context's captures on a successful match.
#[derive(Debug, Clone)]
pub struct PatternMatcher {
    regex: Regex,
    has_named_groups: bool,
    agent_id: String,
}

impl PatternMatcher {
    /// Compiles `pattern`.
    pub fn new(pattern: &str) -> RouteResult<Self> {
        let regex = Regex::new(pattern).map_err(|source| RouteError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        let has_named_groups = regex.capture_names().flatten().next().is_some();
        Ok(Self {
            regex,
            has_named_groups,
            agent_id: String::new(),
        })
    }

    /// Returns the source pattern.
    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    /// Runs the regex, returning the named captures on success.
    fn search(&self, text: &str) -> Option<Vec<(String, String)>> {
        if !self.has_named_groups {
            return self.regex.is_match(text).then(Vec::new);
        }
        let caps = self.regex.captures(text)?;
        Some(
            self.regex
                .capture_names()
                .flatten()
                .filter_map(|name| {
                    caps.name(name)
                        .map(|m| (name.to_string(), m.as_str().to_string()))
                })
                .collect(),
        )
    }
}

impl Matcher for PatternMatcher {
    fn matches(&self, ctx: MatchContext) -> MatchOutcome {
        let found = {
            let text = strip_direct_mention(&ctx.message().text, &self.agent_id);
            self.search(text)
        };

        trace!(
            pattern = self.regex.as_str(),
            matched = found.is_some(),
            "Pattern matcher evaluated"
        );

        match found {
            Some(named) if named.is_empty() => MatchOutcome::hit(ctx),
            Some(named) => MatchOutcome::hit(ctx.merge_captures(named)),
            None => MatchOutcome::miss(ctx),
        }
    }

    fn set_identity(&mut self, agent_id: &str) {
        self.agent_id = agent_id.to_string();
    }
}

// ============================================================================
// Types Matcher
// ============================================================================

/// Matches when the message satisfies any of the configured types.
///
/// Types are checked in configuration order. `Mention` and `Ambient` have no
/// predicate and never match.
#[derive(Debug, Clone)]
pub struct TypesMatcher {
    types: Vec<MessageType>,
    agent_id: String,
}

impl TypesMatcher {
    /// Creates a matcher over `types`. Rejects an empty set.
    pub fn new(types: impl IntoIterator<Item = MessageType>) -> RouteResult<Self> {
        let types: Vec<_> = types.into_iter().collect();
        if types.is_empty() {
            return Err(RouteError::EmptyTypeSet);
        }
        Ok(Self {
            types,
            agent_id: String::new(),
        })
    }

    /// Returns the configured types.
    pub fn types(&self) -> &[MessageType] {
        &self.types
    }

    fn satisfies(&self, ty: MessageType, ctx: &MatchContext) -> bool {
        let msg = ctx.message();
        match ty {
            MessageType::DirectMessage => is_direct_message(msg),
            MessageType::DirectMention => is_direct_mention(msg, &self.agent_id),
            MessageType::Mention | MessageType::Ambient => false,
        }
    }
}

impl Matcher for TypesMatcher {
    fn matches(&self, ctx: MatchContext) -> MatchOutcome {
        let hit = self.types.iter().copied().find(|ty| self.satisfies(*ty, &ctx));

        trace!(
            types = ?self.types,
            hit = ?hit,
            "Types matcher evaluated"
        );

        MatchOutcome::from_bool(hit.is_some(), ctx)
    }

    fn set_identity(&mut self, agent_id: &str) {
        self.agent_id = agent_id.to_string();
    }
}

// ============================================================================
// Fn Matcher
// ============================================================================

/// Wraps a predicate closure as a matcher.
pub struct FnMatcher<F> {
    check: F,
}

impl<F> FnMatcher<F>
where
    F: Fn(&MatchContext) -> bool + Send + Sync + 'static,
{
    /// Creates a matcher from `check`.
    pub fn new(check: F) -> Self {
        Self { check }
    }
}

impl<F> fmt::Debug for FnMatcher<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnMatcher").finish_non_exhaustive()
    }
}

impl<F> Matcher for FnMatcher<F>
where
    F: Fn(&MatchContext) -> bool + Send + Sync + 'static,
{
    fn matches(&self, ctx: MatchContext) -> MatchOutcome {
        let matched = (self.check)(&ctx);
        MatchOutcome::from_bool(matched, ctx)
    }
}
