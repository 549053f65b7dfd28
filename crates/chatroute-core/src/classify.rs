//! Message classification helpers.
//!
//! Pure functions over a [`MessageEvent`] and the agent identity. Two mention
//! spellings are recognised:
//!
//! - the Slack escape form `<@U123>` or `<@U123|name>`
//! - a plain `@U123` followed by a non-identifier character
//!
//! A mention may be followed by a `:` or `,` and whitespace, all of which are
//! consumed together with the token.

use crate::message::MessageEvent;

/// Returns `true` if the message was delivered over a one-to-one conversation.
pub fn is_direct_message(msg: &MessageEvent) -> bool {
    msg.channel_kind.is_direct()
}

/// Returns `true` if the message text begins with a mention of `agent_id`.
///
/// An empty `agent_id` never matches.
pub fn is_direct_mention(msg: &MessageEvent, agent_id: &str) -> bool {
    strip_one_mention(&msg.text, agent_id).is_some()
}

/// Removes a leading mention of `agent_id` from `text`.
///
/// Consecutive leading mentions of the agent are removed as one unit, so
/// stripping is idempotent. Text that does not start with a mention of the
/// agent is returned unchanged.
pub fn strip_direct_mention<'a>(text: &'a str, agent_id: &str) -> &'a str {
    let mut rest = match strip_one_mention(text, agent_id) {
        Some(rest) => rest,
        None => return text,
    };
    while let Some(next) = strip_one_mention(rest, agent_id) {
        rest = next;
    }
    rest
}

/// Strips exactly one leading mention token, returning the remainder with its
/// leading separator and whitespace removed.
fn strip_one_mention<'a>(text: &'a str, agent_id: &str) -> Option<&'a str> {
    if agent_id.is_empty() {
        return None;
    }

    let trimmed = text.trim_start();
    let after = if let Some(escaped) = trimmed.strip_prefix("<@") {
        let tail = escaped.strip_prefix(agent_id)?;
        if let Some(rest) = tail.strip_prefix('>') {
            rest
        } else {
            // <@U123|display-name>
            let labelled = tail.strip_prefix('|')?;
            let close = labelled.find('>')?;
            &labelled[close + 1..]
        }
    } else {
        let tail = trimmed.strip_prefix('@')?.strip_prefix(agent_id)?;
        if tail.chars().next().is_some_and(is_identifier_char) {
            return None;
        }
        tail
    };

    let after = after.strip_prefix([':', ',']).unwrap_or(after);
    Some(after.trim_start())
}

fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '-' | '.')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::ChannelKind;

    #[test]
    fn test_direct_message() {
        let dm = MessageEvent::new("D1", "hello");
        let group = MessageEvent::new("C1", "hello");
        assert!(is_direct_message(&dm));
        assert!(!is_direct_message(&group));
        assert!(!is_direct_message(
            &MessageEvent::new("G1", "hello").with_channel_kind(ChannelKind::Group)
        ));
    }

    #[test]
    fn test_direct_mention_plain() {
        let msg = MessageEvent::new("C1", "@agent ping");
        assert!(is_direct_mention(&msg, "agent"));
        assert!(!is_direct_mention(&msg, "other"));
        assert!(!is_direct_mention(&msg, ""));
    }

    #[test]
    fn test_direct_mention_escaped() {
        assert!(is_direct_mention(&MessageEvent::new("C1", "<@U42> ping"), "U42"));
        assert!(is_direct_mention(
            &MessageEvent::new("C1", "<@U42|pingbot> ping"),
            "U42"
        ));
        assert!(!is_direct_mention(&MessageEvent::new("C1", "<@U420> ping"), "U42"));
    }

    #[test]
    fn test_direct_mention_requires_prefix() {
        let msg = MessageEvent::new("C1", "hey @agent ping");
        assert!(!is_direct_mention(&msg, "agent"));
    }

    #[test]
    fn test_direct_mention_word_boundary() {
        let msg = MessageEvent::new("C1", "@agentsmith ping");
        assert!(!is_direct_mention(&msg, "agent"));
    }

    #[test]
    fn test_strip_mention_variants() {
        assert_eq!(strip_direct_mention("@agent ping", "agent"), "ping");
        assert_eq!(strip_direct_mention("<@U42> ping", "U42"), "ping");
        assert_eq!(strip_direct_mention("<@U42|bot>: ping", "U42"), "ping");
        assert_eq!(strip_direct_mention("@agent, ping me", "agent"), "ping me");
        assert_eq!(strip_direct_mention("  @agent   ping", "agent"), "ping");
        assert_eq!(strip_direct_mention("@agent", "agent"), "");
    }

    #[test]
    fn test_strip_mention_unchanged() {
        assert_eq!(strip_direct_mention("ping", "agent"), "ping");
        assert_eq!(strip_direct_mention("  ping ", "agent"), "  ping ");
        assert_eq!(strip_direct_mention("@other ping", "agent"), "@other ping");
        assert_eq!(strip_direct_mention("@agent ping", ""), "@agent ping");
    }

    #[test]
    fn test_strip_mention_idempotent() {
        for text in ["ping", "@agent ping", "@agent @agent ping", "<@agent> x", ""] {
            let once = strip_direct_mention(text, "agent");
            assert_eq!(strip_direct_mention(once, "agent"), once, "input: {text:?}");
        }
    }
}
