//! Message dispatcher - Routes messages to handlers and sends the replies

use crate::application::errors::BotError;
use crate::application::services::CommandService;
use crate::domain::entities::{Message, User};
use crate::domain::traits::Bot;
use super::parser::MessageParser;

/// Message dispatcher - parses, routes and answers one message at a time
pub struct MessageDispatcher {
    parser: MessageParser,
    commands: CommandService,
}

impl MessageDispatcher {
    pub fn new(commands: CommandService) -> Self {
        Self {
            parser: MessageParser::new(),
            commands,
        }
    }

    pub fn with_parser(mut self, parser: MessageParser) -> Self {
        self.parser = parser;
        self
    }

    pub fn commands(&self) -> &CommandService {
        &self.commands
    }

    /// Parse raw message text and dispatch it
    pub async fn dispatch_text(
        &self,
        bot: &dyn Bot,
        chat_id: &str,
        text: Option<&str>,
        sender: Option<User>,
    ) -> Result<String, BotError> {
        let message = self.parser.parse(chat_id, text, sender);
        self.dispatch(bot, &message).await
    }

    /// Route a message to its handler and send the response.
    /// Returns the platform id of the sent message.
    pub async fn dispatch(&self, bot: &dyn Bot, message: &Message) -> Result<String, BotError> {
        let response = self.commands.handle(message)?;
        bot.send_response(&message.chat_id, &response).await
    }

    /// Dispatch a message, logging instead of propagating any failure.
    /// Returns whether a reply was sent.
    pub async fn handle(&self, bot: &dyn Bot, message: &Message) -> bool {
        match self.dispatch(bot, message).await {
            Ok(message_id) => {
                tracing::debug!("[{}] Replied with message {}", message.chat_id, message_id);
                true
            }
            Err(e) => {
                tracing::error!(
                    "[{}] Failed to handle message from {}: {}",
                    message.chat_id,
                    message.sender_id(),
                    e
                );
                false
            }
        }
    }

    pub fn parser(&self) -> &MessageParser {
        &self.parser
    }
}
