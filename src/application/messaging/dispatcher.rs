//! Message dispatcher - Routes messages to commands and plugins

use crate::application::errors::{CommandError, PluginError};
use crate::application::services::CommandService;
use crate::domain::entities::{Content, Message, User};
use crate::plugins::{Plugin, PluginManager};
use super::parser::MessageParser;

/// Message dispatcher - one inbound message in, at most one reply out
pub struct MessageDispatcher {
    parser: MessageParser,
    commands: CommandService,
    plugins: PluginManager,
}

impl MessageDispatcher {
    pub fn new(prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        let mut commands = CommandService::new(prefix.clone());
        commands.register_defaults();
        Self {
            parser: MessageParser::new(prefix),
            commands,
            plugins: PluginManager::new(),
        }
    }

    /// Register a plugin and install its commands
    pub fn register_plugin<P: Plugin + 'static>(&mut self, plugin: P) -> Result<(), PluginError> {
        let plugin = self.plugins.register(plugin)?;
        for command in plugin.commands() {
            self.commands.register(command);
        }
        Ok(())
    }

    pub fn plugins(&self) -> &PluginManager {
        &self.plugins
    }

    pub fn commands(&self) -> &CommandService {
        &self.commands
    }

    /// Process a raw text message
    pub fn process_text(&self, text: impl Into<String>, sender: Option<User>) -> Option<String> {
        let message = self.parser.parse(text, sender);
        self.process(message)
    }

    /// Process a message through commands, then plugins
    pub fn process(&self, message: Message) -> Option<String> {
        let message = self.parser.classify(message);

        match &message.content {
            Content::Command { name, .. } => match self.commands.handle(&message) {
                Ok(reply) => reply,
                Err(CommandError::NotFound(_)) => {
                    tracing::debug!("Ignoring unknown command /{}", name);
                    None
                }
                Err(e) => {
                    tracing::warn!("Command /{} failed: {}", name, e);
                    Some(format!("Error: {}", e))
                }
            },
            Content::Text(_) => self.plugins.on_message(&message),
            Content::Empty => None,
        }
    }
}
