//! Plugin manager - handles plugin registration and passive message handling

use crate::application::errors::PluginError;
use crate::domain::entities::Message;
use crate::plugins::trait_def::{Plugin, PluginInfo};
use std::sync::Arc;
use tracing::{debug, info};

/// Manages all plugins for the bot, in registration order
#[derive(Default)]
pub struct PluginManager {
    plugins: Vec<Arc<dyn Plugin>>,
}

impl PluginManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a plugin
    pub fn register<P: Plugin + 'static>(&mut self, plugin: P) -> Result<Arc<dyn Plugin>, PluginError> {
        let name = plugin.name().to_string();

        if self.has_plugin(&name) {
            return Err(PluginError::AlreadyRegistered(name));
        }

        info!("Registering plugin: {}", name);
        let plugin: Arc<dyn Plugin> = Arc::new(plugin);
        self.plugins.push(Arc::clone(&plugin));
        Ok(plugin)
    }

    /// Offer a non-command message to each plugin; the first reply wins
    pub fn on_message(&self, message: &Message) -> Option<String> {
        self.plugins.iter().find_map(|plugin| {
            let reply = plugin.on_message(message)?;
            debug!("Plugin '{}' answered message", plugin.name());
            Some(reply)
        })
    }

    /// List all registered plugins
    pub fn list_plugins(&self) -> Vec<PluginInfo> {
        self.plugins.iter().map(|plugin| {
            PluginInfo {
                name: plugin.name().to_string(),
                description: plugin.description().to_string(),
                commands: plugin.commands().into_iter().map(|c| c.name).collect(),
            }
        }).collect()
    }

    /// Check if a plugin exists
    pub fn has_plugin(&self, name: &str) -> bool {
        self.plugins.iter().any(|p| p.name() == name)
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Command;

    struct Echo(&'static str);

    impl Plugin for Echo {
        fn name(&self) -> &str {
            self.0
        }

        fn description(&self) -> &str {
            "echoes"
        }

        fn commands(&self) -> Vec<Command> {
            vec![Command::new(format!("{}-cmd", self.0))]
        }

        fn on_message(&self, message: &Message) -> Option<String> {
            let text = message.content.text()?;
            text.starts_with(self.0).then(|| format!("{} says {}", self.0, text))
        }
    }

    #[test]
    fn rejects_duplicate_names() {
        let mut manager = PluginManager::new();
        manager.register(Echo("a")).unwrap();
        assert!(matches!(
            manager.register(Echo("a")),
            Err(PluginError::AlreadyRegistered(_))
        ));
        assert_eq!(manager.len(), 1);
    }

    #[test]
    fn first_reply_wins() {
        let mut manager = PluginManager::new();
        manager.register(Echo("ab")).unwrap();
        manager.register(Echo("a")).unwrap();

        let reply = manager.on_message(&Message::from_text("abc"));
        assert_eq!(reply.as_deref(), Some("ab says abc"));
        assert_eq!(manager.on_message(&Message::from_text("zzz")), None);
    }

    #[test]
    fn lists_commands() {
        let mut manager = PluginManager::new();
        manager.register(Echo("a")).unwrap();
        let info = manager.list_plugins();
        assert_eq!(info[0].commands, ["a-cmd"]);
    }
}
