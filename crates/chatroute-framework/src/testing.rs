//! Shared fixtures for unit tests.

use std::any::Any;
use std::io;
use std::sync::{Arc, Mutex};

use chatroute_core::{Agent, MatchContext, MessageEvent};

pub(crate) const AGENT_ID: &str = "agent";

#[derive(Debug)]
pub(crate) struct TestAgent;

impl Agent for TestAgent {
    fn id(&self) -> &str {
        AGENT_ID
    }

    fn as_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

/// Builds a context for a message in `channel`; the channel kind is inferred
/// from the id prefix (`D…` is direct).
pub(crate) fn context(channel: &str, text: &str) -> MatchContext {
    MatchContext::new(
        Arc::new(TestAgent),
        MessageEvent::new(channel, text).with_user("U_SENDER"),
    )
}

#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Runs `f` under a thread-local subscriber capped at `level` and returns
/// the formatted log output.
pub(crate) fn capture_logs(level: tracing::Level, f: impl FnOnce()) -> String {
    let buffer = LogBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();

    tracing::subscriber::with_default(subscriber, f);

    let bytes = buffer.0.lock().unwrap();
    String::from_utf8_lossy(&bytes).into_owned()
}
