use super::User;

/// Message content
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    Text(String),
    Command { name: String, args: Vec<String> },
    Empty,
}

impl Content {
    pub fn command_name(&self) -> Option<&str> {
        match self {
            Content::Command { name, .. } => Some(name),
            _ => None,
        }
    }
}

/// Represents an incoming message, independent of the platform it came from
#[derive(Debug, Clone)]
pub struct Message {
    pub chat_id: String,
    pub sender: Option<User>,
    pub content: Content,
}

impl Message {
    pub fn new(chat_id: impl Into<String>, content: Content) -> Self {
        Self {
            chat_id: chat_id.into(),
            sender: None,
            content,
        }
    }

    pub fn from_text(chat_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(chat_id, Content::Text(text.into()))
    }

    pub fn from_command(chat_id: impl Into<String>, name: impl Into<String>, args: Vec<String>) -> Self {
        Self::new(chat_id, Content::Command { name: name.into(), args })
    }

    pub fn with_sender_opt(mut self, user: Option<User>) -> Self {
        self.sender = user;
        self
    }

    /// Identifier used when logging who sent the message.
    /// Falls back to the chat id for anonymous senders (channel posts).
    pub fn sender_id(&self) -> &str {
        self.sender
            .as_ref()
            .map(|u| u.id.as_str())
            .unwrap_or(self.chat_id.as_str())
    }
}
