//! Serving harness: binds a router to an agent and feeds it messages.
//!
//! ```rust,ignore
//! use chatroute_runtime::AgentRuntime;
//!
//! let runtime = AgentRuntime::builder()
//!     .config_file("chatroute.toml")
//!     .build(router)?;
//!
//! runtime.serve(inbound_rx).await;
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::mpsc;
use tower::ServiceExt;
use tracing::{Instrument, debug, debug_span, info};

use chatroute_core::{Agent, BoxedAgent, MatchContext, MessageEvent};
use chatroute_framework::{DispatchOutcome, Router, RouterService};

use crate::agent::ConfiguredAgent;
use crate::config::{ChatrouteConfig, ConfigLoader, validate_config};
use crate::error::RuntimeResult;
use crate::logging;

/// A frozen router bound to the agent it serves.
///
/// Construction sets the router's identity and validates the tree, so a
/// runtime never serves a router with build errors. After that the router is
/// shared read-only and messages can be handled concurrently.
#[derive(Debug, Clone)]
pub struct AgentRuntime {
    agent: BoxedAgent,
    service: RouterService,
}

/// Counters reported when [`AgentRuntime::serve`] returns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ServeSummary {
    pub received: u64,
    pub matched: u64,
}

impl AgentRuntime {
    /// Binds `router` to `agent`, propagating the agent's id through the tree.
    pub fn new(agent: BoxedAgent, mut router: Router) -> RuntimeResult<Self> {
        router.set_identity(agent.id());
        router.validate()?;

        info!(
            agent_id = agent.id(),
            agent_name = agent.name(),
            routes = router.len(),
            "Router bound to agent"
        );

        Ok(Self {
            agent,
            service: RouterService::new(router),
        })
    }

    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Validates `config`, installs logging from it and binds `router` to a
    /// [`ConfiguredAgent`].
    pub fn from_config(config: &ChatrouteConfig, router: Router) -> RuntimeResult<Self> {
        validate_config(config)?;
        logging::init_from_config(&config.logging);
        Self::new(Arc::new(ConfiguredAgent::from_config(&config.agent)), router)
    }

    pub fn agent(&self) -> &BoxedAgent {
        &self.agent
    }

    pub fn router(&self) -> &Router {
        self.service.router()
    }

    /// A clone of the underlying tower service, for wrapping in middleware.
    pub fn service(&self) -> RouterService {
        self.service.clone()
    }

    /// Routes one message and awaits its handler, if any.
    pub async fn handle(&self, message: MessageEvent) -> DispatchOutcome {
        let span = debug_span!(
            "dispatch",
            channel = %message.channel,
            user = message.user.as_deref().unwrap_or("-")
        );
        let ctx = MatchContext::new(Arc::clone(&self.agent), message);

        self.service
            .clone()
            .oneshot(ctx)
            .instrument(span)
            .await
            .unwrap_or_else(|never| match never {})
    }

    /// Handles messages in arrival order until every sender is dropped.
    pub async fn serve(&self, mut inbound: mpsc::Receiver<MessageEvent>) -> ServeSummary {
        let mut summary = ServeSummary::default();

        info!(agent_id = self.agent.id(), "Serving messages");
        while let Some(message) = inbound.recv().await {
            summary.received += 1;
            let outcome = self.handle(message).await;
            if outcome.matched {
                summary.matched += 1;
            } else {
                debug!("No route matched");
            }
        }
        info!(
            received = summary.received,
            matched = summary.matched,
            "Inbound channel closed"
        );

        summary
    }
}

// =============================================================================
// Builder
// =============================================================================

/// Builds an [`AgentRuntime`] from layered configuration.
#[derive(Debug)]
pub struct RuntimeBuilder {
    loader: ConfigLoader,
    init_logging: bool,
}

impl Default for RuntimeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RuntimeBuilder {
    pub fn new() -> Self {
        Self {
            loader: ConfigLoader::new(),
            init_logging: true,
        }
    }

    /// Loads exactly this file instead of searching.
    pub fn config_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.loader = self.loader.file(path.into());
        self
    }

    pub fn search_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.loader = self.loader.search_path(path.into());
        self
    }

    pub fn profile(mut self, profile: impl AsRef<str>) -> Self {
        self.loader = self.loader.profile(profile);
        self
    }

    /// Merges programmatic defaults; files and environment still win.
    pub fn merge(mut self, config: ChatrouteConfig) -> Self {
        self.loader = self.loader.merge(config);
        self
    }

    pub fn without_env(mut self) -> Self {
        self.loader = self.loader.without_env();
        self
    }

    /// Leaves the global subscriber alone.
    pub fn without_logging(mut self) -> Self {
        self.init_logging = false;
        self
    }

    pub fn build(self, router: Router) -> RuntimeResult<AgentRuntime> {
        let config = self.loader.load_validated()?;
        if self.init_logging {
            logging::init_from_config(&config.logging);
        }
        AgentRuntime::new(Arc::new(ConfiguredAgent::from_config(&config.agent)), router)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AgentConfig, ConfigError};
    use crate::error::RuntimeError;
    use chatroute_core::{ChannelKind, MessageType};
    use chatroute_framework::RouteError;
    use std::sync::Mutex;

    const AGENT_ID: &str = "U0AGENT";

    fn agent() -> BoxedAgent {
        Arc::new(ConfiguredAgent::new(AGENT_ID).with_name("pingbot"))
    }

    /// Records `pong` for pings and the `word` capture for echoes.
    fn recording_router(log: &Arc<Mutex<Vec<String>>>) -> Router {
        let mut router = Router::new();

        let pong = Arc::clone(log);
        let echo = Arc::clone(log);
        router
            .of_types([MessageType::DirectMention, MessageType::DirectMessage])
            .subrouter(move |tome| {
                tome.hear("^ping$").name("ping").handle(move |_ctx| {
                    let log = Arc::clone(&pong);
                    async move { log.lock().unwrap().push("pong".to_string()) }
                });
                tome.hear(r"^echo (?P<word>\w+)$")
                    .name("echo")
                    .handle(move |ctx| {
                        let log = Arc::clone(&echo);
                        async move {
                            let word = ctx.capture("word").unwrap_or_default().to_string();
                            log.lock().unwrap().push(word);
                        }
                    });
            });

        router
    }

    fn message(channel: &str, text: &str) -> MessageEvent {
        MessageEvent::new(channel, text).with_user("U_SENDER")
    }

    #[tokio::test]
    async fn test_handle_mention() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let runtime = AgentRuntime::new(agent(), recording_router(&log)).unwrap();

        let outcome = runtime.handle(message("C1", "<@U0AGENT> ping")).await;

        assert!(outcome.matched);
        assert_eq!(outcome.route.as_deref(), Some("ping"));
        assert_eq!(*log.lock().unwrap(), vec!["pong"]);
    }

    #[tokio::test]
    async fn test_handle_direct_message_with_capture() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let runtime = AgentRuntime::new(agent(), recording_router(&log)).unwrap();

        let dm = message("D1", "echo hello");
        assert_eq!(dm.channel_kind, ChannelKind::Direct);
        let outcome = runtime.handle(dm).await;

        assert_eq!(outcome.route.as_deref(), Some("echo"));
        assert_eq!(*log.lock().unwrap(), vec!["hello"]);
    }

    #[tokio::test]
    async fn test_handle_ambient_is_ignored() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let runtime = AgentRuntime::new(agent(), recording_router(&log)).unwrap();

        let outcome = runtime.handle(message("C1", "ping")).await;

        assert_eq!(outcome, DispatchOutcome::default());
        assert!(log.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_serve_until_closed() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let runtime = AgentRuntime::new(agent(), recording_router(&log)).unwrap();

        let (tx, rx) = mpsc::channel(8);
        for text in ["<@U0AGENT> ping", "chatter", "<@U0AGENT>: echo hi"] {
            tx.send(message("C1", text)).await.unwrap();
        }
        drop(tx);

        let summary = runtime.serve(rx).await;

        assert_eq!(
            summary,
            ServeSummary {
                received: 3,
                matched: 2
            }
        );
        assert_eq!(*log.lock().unwrap(), vec!["pong", "hi"]);
    }

    #[test]
    fn test_new_rejects_invalid_router() {
        let mut router = Router::new();
        router.hear("(unclosed").handle(|_ctx| async {});

        let err = AgentRuntime::new(agent(), router).unwrap_err();
        assert!(matches!(
            err,
            RuntimeError::Route(RouteError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn test_new_sets_identity() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let runtime = AgentRuntime::new(agent(), recording_router(&log)).unwrap();
        assert_eq!(runtime.agent().id(), AGENT_ID);
        assert_eq!(runtime.router().len(), 1);
    }

    #[test]
    fn test_from_config_requires_agent_id() {
        let err = AgentRuntime::from_config(&ChatrouteConfig::default(), Router::new())
            .unwrap_err();
        assert!(matches!(
            err,
            RuntimeError::Config(ConfigError::MissingField { .. })
        ));
    }

    #[test]
    fn test_builder_with_merge() {
        figment::Jail::expect_with(|jail| {
            let log = Arc::new(Mutex::new(Vec::new()));
            let runtime = AgentRuntime::builder()
                .search_path(jail.directory())
                .without_env()
                .without_logging()
                .merge(ChatrouteConfig {
                    agent: AgentConfig {
                        id: AGENT_ID.into(),
                        name: None,
                    },
                    ..Default::default()
                })
                .build(recording_router(&log))
                .map_err(|e| e.to_string())?;

            assert_eq!(runtime.agent().id(), AGENT_ID);
            Ok(())
        });
    }
}
