//! Platform-neutral inbound events.

/// What an inbound message carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundKind {
    /// Plain text typed by the user.
    Text(String),
    /// A slash command such as `/start`. `name` is lowercased and stripped
    /// of any `@botname` suffix.
    Command { name: String, args: String },
    /// Anything else (stickers, photos, service messages...).
    Unsupported { media: &'static str },
}

impl InboundKind {
    /// Classify a text body. Only Telegram's command grammar
    /// (`/name` or `/name@bot`, name of 1 to 32 `[A-Za-z0-9_]`) counts as a
    /// command; any other text, slash or not, is plain text.
    pub fn from_text(text: &str) -> Self {
        match parse_command(text) {
            Some((name, args)) => Self::Command { name, args },
            None => Self::Text(text.to_string()),
        }
    }
}

/// One message received from the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundEvent {
    /// Stable identity of the sender.
    pub peer_id: String,
    /// Conversation to reply into.
    pub chat_id: String,
    pub kind: InboundKind,
}

impl InboundEvent {
    pub fn text(peer_id: impl Into<String>, chat_id: impl Into<String>, text: &str) -> Self {
        Self {
            peer_id: peer_id.into(),
            chat_id: chat_id.into(),
            kind: InboundKind::from_text(text),
        }
    }
}

/// Longest command name Telegram accepts.
const MAX_COMMAND_LEN: usize = 32;

fn is_command_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Split `/name@bot rest` into `("name", "rest")`.
fn parse_command(text: &str) -> Option<(String, String)> {
    let body = text.strip_prefix('/')?;
    let mut parts = body.splitn(2, char::is_whitespace);
    let head = parts.next().unwrap_or_default();
    let (name, bot) = match head.split_once('@') {
        Some((name, bot)) => (name, Some(bot)),
        None => (head, None),
    };
    if name.is_empty() || name.len() > MAX_COMMAND_LEN || !name.chars().all(is_command_char) {
        return None;
    }
    if bot.is_some_and(|bot| bot.is_empty() || !bot.chars().all(is_command_char)) {
        return None;
    }
    let args = parts.next().unwrap_or_default().trim().to_string();
    Some((name.to_ascii_lowercase(), args))
}

#[cfg(test)]
mod tests {
    use {super::*, rstest::rstest};

    #[rstest]
    #[case("/start", "start", "")]
    #[case("/Start", "start", "")]
    #[case("/start@daylog_bot", "start", "")]
    #[case("/help me please", "help", "me please")]
    #[case("/start\nextra", "start", "extra")]
    #[case("/set_time_2 18:30", "set_time_2", "18:30")]
    fn commands(#[case] input: &str, #[case] name: &str, #[case] args: &str) {
        assert_eq!(InboundKind::from_text(input), InboundKind::Command {
            name: name.into(),
            args: args.into(),
        });
    }

    #[rstest]
    #[case("buy milk")]
    #[case("/")]
    #[case("/ spaced")]
    #[case("a/b")]
    #[case("/-")]
    #[case("//")]
    #[case("/😀 note")]
    #[case("/.gitignore is tracked")]
    #[case("/start@")]
    #[case("/start@bot!")]
    #[case("/path/to/file")]
    #[case("/abcdefghijklmnopqrstuvwxyz0123456")]
    fn plain_text(#[case] input: &str) {
        assert_eq!(InboundKind::from_text(input), InboundKind::Text(input.into()));
    }

    #[test]
    fn text_event_constructor() {
        let event = InboundEvent::text("42", "42", "call mom");
        assert_eq!(event.peer_id, "42");
        assert_eq!(event.kind, InboundKind::Text("call mom".into()));
    }
}
