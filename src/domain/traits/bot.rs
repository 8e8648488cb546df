use async_trait::async_trait;

use crate::application::errors::BotError;
use crate::domain::entities::CommandResponse;

/// Bot trait - abstraction for messaging platform adapters
#[async_trait]
pub trait Bot: Send + Sync {
    /// Prepare the adapter before the first update is handled
    async fn start(&self) -> Result<(), BotError>;

    /// Send a prepared response, with its parse mode and keyboard, to a chat
    async fn send_response(&self, chat_id: &str, response: &CommandResponse) -> Result<String, BotError>;

    /// Get bot info
    fn bot_info(&self) -> BotInfo;
}

/// Bot information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotInfo {
    pub id: String,
    pub name: String,
    pub username: String,
}

/// Entry shown in the platform's command menu
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotCommand {
    pub command: String,
    pub description: String,
}

impl BotCommand {
    pub fn new(command: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            description: description.into(),
        }
    }
}
