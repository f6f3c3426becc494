//! Plugin trait definitions

use crate::domain::entities::{Command, Message};

/// Core plugin trait that all plugins must implement
pub trait Plugin: Send + Sync {
    /// Unique identifier for the plugin
    fn name(&self) -> &str;

    /// Human-readable description
    fn description(&self) -> &str;

    /// Commands this plugin answers. Handlers own whatever state they need.
    fn commands(&self) -> Vec<Command>;

    /// Optional: react to a non-command message with at most one reply
    fn on_message(&self, _message: &Message) -> Option<String> {
        None
    }
}

/// Plugin information for listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginInfo {
    pub name: String,
    pub description: String,
    pub commands: Vec<String>,
}
