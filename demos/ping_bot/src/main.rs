//! Ping Bot Demo
//!
//! Reads one message per line from stdin and routes it. Lines starting with
//! `dm:` arrive in a direct conversation, everything else in a shared
//! channel. Address the bot with `<@U0PINGBOT>` (or whatever `agent.id` is
//! configured to) in shared channels.
//!
//! ```text
//! <@U0PINGBOT> ping          -> pong
//! <@U0PINGBOT>: echo hi all  -> hi all
//! dm: ping                   -> pong
//! dm: what?                  -> help text
//! anyone seen pingbot?       -> ambient reply
//! ```
//!
//! # Usage
//!
//! ```bash
//! CHATROUTE_LOGGING__LEVEL=debug cargo run --package ping-bot
//! ```

use anyhow::Result;
use chatroute::prelude::*;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::info;

const DEFAULT_AGENT_ID: &str = "U0PINGBOT";
const SHARED_CHANNEL: &str = "C0STDIN";
const DIRECT_CHANNEL: &str = "D0STDIN";

// ============================================================================
// Handlers
// ============================================================================

fn reply(ctx: &MatchContext, text: &str) {
    let to = ctx.message().user.as_deref().unwrap_or("someone");
    println!("[{}] @{to}: {text}", ctx.message().channel);
}

async fn pong(ctx: MatchContext) {
    reply(&ctx, "pong");
}

async fn echo(ctx: MatchContext) {
    reply(&ctx, ctx.capture("text").unwrap_or_default());
}

async fn fail(_ctx: MatchContext) -> Result<(), String> {
    Err("asked to fail".to_string())
}

async fn help(ctx: MatchContext) {
    reply(&ctx, "try `ping`, `echo <text>` or `fail`");
}

async fn overheard(ctx: MatchContext) {
    reply(&ctx, "you rang? mention me to talk");
}

fn build_router() -> Router {
    let mut router = Router::new();

    router
        .of_types([MessageType::DirectMention, MessageType::DirectMessage])
        .name("to me")
        .preprocess(|ctx| {
            let mut message = ctx.message().clone();
            message.text = message.text.trim().to_string();
            ctx.with_message(message)
        })
        .subrouter(|tome| {
            tome.hear("(?i)^ping$").name("ping").handle(pong);
            tome.hear(r"^echo (?P<text>.+)$").name("echo").handle(echo);
            tome.hear("^fail$").name("fail").handle(fail);
            tome.route().name("help").handle(help);
        });

    router
        .hear(r"(?i)\bpingbot\b")
        .name("overheard")
        .handle(overheard);

    router
}

// ============================================================================
// Main
// ============================================================================

fn parse_line(line: &str) -> Option<MessageEvent> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let message = match line.strip_prefix("dm:") {
        Some(text) => MessageEvent::new(DIRECT_CHANNEL, text.trim_start()),
        None => MessageEvent::new(SHARED_CHANNEL, line),
    };
    Some(message.with_user("U0STDIN"))
}

#[tokio::main]
async fn main() -> Result<()> {
    let mut config = ConfigLoader::new().load()?;
    if config.agent.id.is_empty() {
        config.agent.id = DEFAULT_AGENT_ID.to_string();
    }

    let runtime = AgentRuntime::from_config(&config, build_router())?;
    info!(
        agent_id = runtime.agent().id(),
        "Ping bot ready, type messages on stdin (Ctrl+D to quit)"
    );

    let (tx, rx) = mpsc::channel(32);
    let reader = tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Some(line) = lines.next_line().await? {
            if let Some(message) = parse_line(&line)
                && tx.send(message).await.is_err()
            {
                break;
            }
        }
        anyhow::Ok(())
    });

    let summary = runtime.serve(rx).await;
    reader.await??;

    info!(
        received = summary.received,
        matched = summary.matched,
        "Ping bot stopped"
    );
    Ok(())
}
