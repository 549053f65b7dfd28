//! Message types for the routing core.
//!
//! [`MessageEvent`] is deliberately small: it carries only what matchers
//! consult. Platform adapters translate their own payloads into it.

use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// Channel Kind
// ============================================================================

/// The kind of conversation a message was delivered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelKind {
    /// A one-to-one conversation between a user and the agent.
    Direct,
    /// A private multi-party conversation.
    Group,
    /// A public multi-party channel.
    #[default]
    Channel,
}

impl ChannelKind {
    /// Infers the channel kind from a Slack-style channel identifier.
    ///
    /// `D…` is a direct conversation, `G…` a private group, anything else a
    /// channel.
    pub fn from_channel_id(channel_id: &str) -> Self {
        match channel_id.as_bytes().first() {
            Some(b'D') => Self::Direct,
            Some(b'G') => Self::Group,
            _ => Self::Channel,
        }
    }

    /// Returns `true` for one-to-one conversations.
    pub fn is_direct(self) -> bool {
        matches!(self, Self::Direct)
    }
}

// ============================================================================
// Message Event
// ============================================================================

/// An inbound text message.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MessageEvent {
    /// The raw message text, including any leading mention.
    pub text: String,

    /// Identifier of the conversation the message arrived in.
    #[serde(default)]
    pub channel: String,

    /// Kind of the conversation.
    #[serde(default)]
    pub channel_kind: ChannelKind,

    /// Identifier of the sending user, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,

    /// Platform timestamp of the message, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl MessageEvent {
    /// Creates a message in the given channel, inferring the channel kind from
    /// the channel identifier.
    pub fn new(channel: impl Into<String>, text: impl Into<String>) -> Self {
        let channel = channel.into();
        Self {
            channel_kind: ChannelKind::from_channel_id(&channel),
            channel,
            text: text.into(),
            user: None,
            timestamp: None,
        }
    }

    /// Overrides the channel kind.
    pub fn with_channel_kind(mut self, kind: ChannelKind) -> Self {
        self.channel_kind = kind;
        self
    }

    /// Sets the sending user.
    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    /// Sets the platform timestamp.
    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }
}

// ============================================================================
// Message Type
// ============================================================================

/// Classification tags a types matcher can be configured with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageType {
    /// Delivered over a one-to-one conversation.
    DirectMessage,
    /// Text begins with a mention of the agent.
    DirectMention,
    /// The agent is mentioned somewhere in the text.
    ///
    /// Declared for configuration compatibility; no predicate is wired yet,
    /// so it never matches.
    Mention,
    /// Any message not addressed to the agent.
    ///
    /// Declared for configuration compatibility; no predicate is wired yet,
    /// so it never matches.
    Ambient,
}

impl MessageType {
    /// Returns the snake-case tag name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DirectMessage => "direct_message",
            Self::DirectMention => "direct_mention",
            Self::Mention => "mention",
            Self::Ambient => "ambient",
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
