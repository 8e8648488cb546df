//! Message parser - Parses raw messages into structured messages

use crate::domain::entities::{Content, Message, User};

/// Parses incoming messages into structured Message objects
#[derive(Debug, Clone, Default)]
pub struct MessageParser {
    bot_username: Option<String>,
}

impl MessageParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only accept `/cmd@name` mentions that name this bot
    pub fn with_bot_username(mut self, username: impl Into<String>) -> Self {
        let username = username.into();
        self.bot_username = Some(username.trim_start_matches('@').to_string());
        self
    }

    /// Parse the text of a message; `None` for messages without text (stickers, photos)
    pub fn parse(&self, chat_id: impl Into<String>, text: Option<&str>, sender: Option<User>) -> Message {
        let content = match text.map(str::trim) {
            None | Some("") => Content::Empty,
            Some(text) if text.starts_with('/') => self.parse_command(text),
            Some(text) => Content::Text(text.to_string()),
        };

        Message::new(chat_id, content).with_sender_opt(sender)
    }

    /// Parse a command message
    fn parse_command(&self, text: &str) -> Content {
        let mut parts = text[1..].split_whitespace();
        let token = parts.next().unwrap_or("");

        let (name, mention) = match token.split_once('@') {
            Some((name, mention)) => (name, Some(mention)),
            None => (token, None),
        };

        if name.is_empty() || !self.is_addressed_to_us(mention) {
            return Content::Text(text.to_string());
        }

        Content::Command {
            name: name.to_string(),
            args: parts.map(str::to_string).collect(),
        }
    }

    fn is_addressed_to_us(&self, mention: Option<&str>) -> bool {
        match (mention, &self.bot_username) {
            (Some(mention), Some(ours)) => mention.eq_ignore_ascii_case(ours),
            _ => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> MessageParser {
        MessageParser::new().with_bot_username("OfflineGamesBot")
    }

    #[test]
    fn parses_plain_command() {
        let msg = parser().parse("1", Some("/start"), None);
        assert_eq!(msg.content, Content::Command { name: "start".into(), args: vec![] });
    }

    #[test]
    fn keeps_arguments() {
        let msg = parser().parse("1", Some("/start  ref-123 extra"), None);
        assert_eq!(
            msg.content,
            Content::Command { name: "start".into(), args: vec!["ref-123".into(), "extra".into()] }
        );
    }

    #[test]
    fn accepts_mention_of_this_bot() {
        let msg = parser().parse("1", Some("/game@offlinegamesbot"), None);
        assert_eq!(msg.content.command_name(), Some("game"));
    }

    #[test]
    fn rejects_mention_of_other_bot() {
        let msg = parser().parse("1", Some("/game@SomeOtherBot"), None);
        assert_eq!(msg.content, Content::Text("/game@SomeOtherBot".into()));
    }

    #[test]
    fn any_mention_accepted_without_known_username() {
        let msg = MessageParser::new().parse("1", Some("/game@Whoever"), None);
        assert_eq!(msg.content.command_name(), Some("game"));
    }

    #[test]
    fn text_and_empty_messages() {
        let p = parser();
        assert_eq!(p.parse("1", Some("hello"), None).content, Content::Text("hello".into()));
        assert_eq!(p.parse("1", Some("/"), None).content, Content::Text("/".into()));
        assert_eq!(p.parse("1", Some("   "), None).content, Content::Empty);
        assert_eq!(p.parse("1", None, None).content, Content::Empty);
    }

    #[test]
    fn attaches_sender() {
        let msg = parser().parse("-100", Some("/start"), Some(User::new("42")));
        assert_eq!(msg.chat_id, "-100");
        assert_eq!(msg.sender_id(), "42");
    }
}
