//! Inbound events and outbound replies at the engine boundary.

use super::DialogueState;
use serde::Serialize;

/// Slash command recognised by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    Cancel,
    /// Any other `/word`; carries the lowercased name without the slash.
    Other(String),
}

impl Command {
    /// Parse `/name` or `/name@botname` at the start of the text. Returns None for free text.
    pub fn parse(text: &str) -> Option<Self> {
        let rest = text.trim_start().strip_prefix('/')?;
        let word = rest.split(char::is_whitespace).next().unwrap_or("");
        let name = word.split('@').next().unwrap_or("").to_lowercase();
        if name.is_empty() {
            return None;
        }
        Some(match name.as_str() {
            "start" => Command::Start,
            "help" => Command::Help,
            "cancel" => Command::Cancel,
            _ => Command::Other(name),
        })
    }
}

/// One message from a user, already mapped from the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundEvent {
    pub conversation_id: String,
    pub display_name: Option<String>,
    pub text: String,
    /// Set when the text is a command rather than free text.
    pub command: Option<Command>,
}

impl InboundEvent {
    /// Build from raw text, recognising commands.
    pub fn new(
        conversation_id: impl Into<String>,
        display_name: Option<String>,
        text: impl Into<String>,
    ) -> Self {
        let text = text.into();
        let command = Command::parse(&text);
        Self {
            conversation_id: conversation_id.into(),
            display_name,
            text,
            command,
        }
    }
}

/// What to send back, and where the conversation ended up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutboundReply {
    pub text: String,
    pub state: DialogueState,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_commands() {
        assert_eq!(Command::parse("/start"), Some(Command::Start));
        assert_eq!(Command::parse("/HELP"), Some(Command::Help));
        assert_eq!(Command::parse(" /cancel now"), Some(Command::Cancel));
        assert_eq!(Command::parse("/cancel@intake_bot"), Some(Command::Cancel));
        assert_eq!(Command::parse("/stats"), Some(Command::Other("stats".into())));
    }

    #[test]
    fn free_text_is_not_a_command() {
        assert_eq!(Command::parse("help me"), None);
        assert_eq!(Command::parse("a/b"), None);
        assert_eq!(Command::parse("/"), None);
        assert_eq!(Command::parse("/ start"), None);
        assert_eq!(Command::parse(""), None);
    }

    #[test]
    fn event_flags_commands() {
        assert_eq!(InboundEvent::new("1", None, "/help").command, Some(Command::Help));
        assert!(InboundEvent::new("1", None, "need help").command.is_none());
    }
}
