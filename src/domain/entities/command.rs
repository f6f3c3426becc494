use crate::application::errors::CommandError;
use crate::domain::entities::Message;

/// Command handler function type
pub type CommandHandler = Box<dyn Fn(&Message, &[String]) -> Result<String, CommandError> + Send + Sync>;

/// Represents a bot command
pub struct Command {
    pub name: String,
    pub description: Option<String>,
    pub aliases: Vec<String>,
    pub usage: Option<String>,
    pub handler: Option<CommandHandler>,
}

impl Command {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            aliases: Vec::new(),
            usage: None,
            handler: None,
        }
    }

    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases = aliases.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_usage(mut self, usage: impl Into<String>) -> Self {
        self.usage = Some(usage.into());
        self
    }

    pub fn with_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&Message, &[String]) -> Result<String, CommandError> + Send + Sync + 'static,
    {
        self.handler = Some(Box::new(handler));
        self
    }

    pub fn matches(&self, input: &str) -> bool {
        let input_lower = input.to_lowercase();
        self.name.to_lowercase() == input_lower
            || self.aliases.iter().any(|a| a.to_lowercase() == input_lower)
    }
}

/// Command registry, kept in registration order so help output is stable
#[derive(Default)]
pub struct CommandRegistry {
    commands: Vec<Command>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a command, replacing any earlier command with the same name
    pub fn register(&mut self, command: Command) {
        if let Some(existing) = self.commands.iter_mut().find(|c| c.name == command.name) {
            tracing::warn!("Command /{} registered twice, replacing", command.name);
            *existing = command;
        } else {
            self.commands.push(command);
        }
    }

    pub fn get(&self, name: &str) -> Option<&Command> {
        self.commands.iter().find(|c| c.name == name)
    }

    /// Finds a command by name or alias; earlier registrations win alias clashes
    pub fn find(&self, input: &str) -> Option<&Command> {
        self.commands.iter().find(|c| c.matches(input))
    }

    pub fn all(&self) -> impl Iterator<Item = &Command> {
        self.commands.iter()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_aliases_case_insensitively() {
        let cmd = Command::new("checkin").with_aliases(["SignIn", "签到"]);
        assert!(cmd.matches("CHECKIN"));
        assert!(cmd.matches("signin"));
        assert!(cmd.matches("签到"));
        assert!(!cmd.matches("rank"));
    }

    #[test]
    fn register_replaces_same_name() {
        let mut registry = CommandRegistry::new();
        registry.register(Command::new("rank").with_description("old"));
        registry.register(Command::new("rank").with_description("new"));
        assert_eq!(registry.len(), 1);
        assert_eq!(
            registry.get("rank").and_then(|c| c.description.as_deref()),
            Some("new")
        );
    }
}
