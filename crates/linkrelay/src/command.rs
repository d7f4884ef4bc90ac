//! Classification of inbound message text

/// What the user asked for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `/start`
    Start,
    /// `/help`
    Help,
    /// `/get <url>`, or plain text treated as a URL
    Fetch(String),
    /// `/get` without an argument
    MissingArgument,
    /// Any other slash command
    Unknown(String),
}

impl Command {
    /// Parse the text of a message
    ///
    /// Commands may carry a `@botname` suffix as Telegram sends them in
    /// group chats.
    pub fn parse(text: &str) -> Self {
        let text = text.trim();
        if !text.starts_with('/') {
            return Command::Fetch(text.to_string());
        }

        let (head, arg) = match text.split_once(char::is_whitespace) {
            Some((head, arg)) => (head, arg.trim()),
            None => (text, ""),
        };
        let name = head.split('@').next().unwrap_or(head);

        match name {
            "/start" => Command::Start,
            "/help" => Command::Help,
            "/get" if arg.is_empty() => Command::MissingArgument,
            "/get" => Command::Fetch(arg.to_string()),
            _ => Command::Unknown(name.to_string()),
        }
    }
}
