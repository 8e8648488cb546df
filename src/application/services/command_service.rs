use std::sync::Arc;

use crate::application::errors::CommandError;
use crate::domain::entities::{Command, CommandHandler, CommandRegistry, CommandResponse, Content, Message};
use crate::domain::traits::BotCommand;

/// Service for managing and executing commands
#[derive(Default)]
pub struct CommandService {
    registry: CommandRegistry,
    fallback: Option<CommandHandler>,
}

impl CommandService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, command: Command) {
        tracing::debug!("Registered command /{}", command.name);
        self.registry.register(command);
    }

    /// Handler for every message that no registered command matches
    pub fn set_fallback<F>(&mut self, handler: F)
    where
        F: Fn(&Message) -> Result<Arc<CommandResponse>, CommandError> + Send + Sync + 'static,
    {
        self.fallback = Some(Box::new(handler));
    }

    pub fn handle(&self, message: &Message) -> Result<Arc<CommandResponse>, CommandError> {
        let command = match &message.content {
            Content::Command { name, .. } => self.registry.find(name),
            _ => None,
        };

        if let Some(handler) = command.and_then(|cmd| cmd.handler.as_ref()) {
            return handler(message);
        }

        match &self.fallback {
            Some(fallback) => fallback(message),
            None => Err(CommandError::NotFound(
                message.content.command_name().unwrap_or("<text>").to_string(),
            )),
        }
    }

    /// Registered commands, in registration order, for the platform command menu
    pub fn bot_commands(&self) -> Vec<BotCommand> {
        self.registry
            .all()
            .map(|cmd| BotCommand::new(cmd.name.clone(), cmd.description.clone().unwrap_or_default()))
            .collect()
    }
}
