use std::sync::Arc;

use super::{CommandResponse, Message};
use crate::application::errors::CommandError;

/// Command handler function type
pub type CommandHandler = Box<dyn Fn(&Message) -> Result<Arc<CommandResponse>, CommandError> + Send + Sync>;

/// Represents a bot command
pub struct Command {
    pub name: String,
    pub description: Option<String>,
    pub handler: Option<CommandHandler>,
}

impl Command {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            handler: None,
        }
    }

    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    pub fn with_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&Message) -> Result<Arc<CommandResponse>, CommandError> + Send + Sync + 'static,
    {
        self.handler = Some(Box::new(handler));
        self
    }

    pub fn matches(&self, input: &str) -> bool {
        self.name == input
    }
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("has_handler", &self.handler.is_some())
            .finish()
    }
}

/// Command registry, kept in registration order
#[derive(Default)]
pub struct CommandRegistry {
    commands: Vec<Command>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a command, replacing any earlier command with the same name.
    pub fn register(&mut self, command: Command) {
        self.commands.retain(|c| !c.matches(&command.name));
        self.commands.push(command);
    }

    pub fn find(&self, input: &str) -> Option<&Command> {
        self.commands.iter().find(|c| c.matches(input))
    }

    pub fn all(&self) -> impl Iterator<Item = &Command> {
        self.commands.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matching_is_exact() {
        let cmd = Command::new("start");
        assert!(cmd.matches("start"));
        assert!(!cmd.matches("START"));
        assert!(!cmd.matches("Start"));
        assert!(!cmd.matches("starts"));
    }

    #[test]
    fn register_replaces_same_name_and_keeps_order() {
        let mut registry = CommandRegistry::new();
        registry.register(Command::new("start").with_description("first"));
        registry.register(Command::new("game"));
        registry.register(Command::new("start").with_description("second"));

        assert_eq!(registry.all().count(), 2);
        let names: Vec<&str> = registry.all().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["game", "start"]);
        assert_eq!(
            registry.find("start").and_then(|c| c.description.as_deref()),
            Some("second")
        );
    }
}
