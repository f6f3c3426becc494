//! Console adapter for development/testing

use async_trait::async_trait;
use crate::application::messaging::resolve_context;
use crate::domain::entities::{Message, Routing, User};
use crate::domain::traits::{Bot, BotInfo};
use crate::application::errors::BotError;

/// Console bot adapter for local development
///
/// Every stdin line is treated as one message from a fixed sender, either in
/// a private chat or in the configured group.
pub struct ConsoleAdapter {
    info: BotInfo,
    sender: User,
    routing: Routing,
}

impl ConsoleAdapter {
    pub fn new(bot_name: impl Into<String>, sender: User) -> Self {
        let routing = Routing::user(sender.id.clone());
        Self {
            info: BotInfo {
                id: "console".to_string(),
                name: bot_name.into(),
                username: "console".to_string(),
            },
            sender,
            routing,
        }
    }

    /// Pretend every line comes from a group chat
    pub fn in_group(mut self, group_id: impl Into<String>) -> Self {
        self.routing = Routing {
            group_id: Some(group_id.into()),
            user_id: Some(self.sender.id.clone()),
        };
        self
    }

    pub fn message_from_line(&self, line: &str) -> Message {
        Message::from_text(line.trim())
            .with_sender(self.sender.clone())
            .with_routing(self.routing.clone())
    }

    /// Context id this adapter's messages resolve to
    pub fn chat_id(&self) -> String {
        resolve_context(&Message::from_text("").with_routing(self.routing.clone()))
    }
}

#[async_trait]
impl Bot for ConsoleAdapter {
    async fn start(&self) -> Result<(), BotError> {
        tracing::info!("Starting console bot (dev mode) as {} in {}", self.sender, self.chat_id());
        Ok(())
    }

    async fn send_message(&self, _chat_id: &str, text: &str) -> Result<String, BotError> {
        println!("[BOT] {}", text);
        Ok(uuid::Uuid::new_v4().to_string())
    }

    fn bot_info(&self) -> BotInfo {
        self.info.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn private_by_default() {
        let adapter = ConsoleAdapter::new("bot", User::new("42").with_nickname("Kazuma"));
        let msg = adapter.message_from_line("  /checkin ");
        assert_eq!(resolve_context(&msg), "private_42");
        assert_eq!(msg.content.text(), Some("/checkin"));
        assert_eq!(msg.sender_name(), "Kazuma");
        assert_eq!(adapter.chat_id(), "private_42");
    }

    #[test]
    fn group_mode_scopes_to_group() {
        let adapter = ConsoleAdapter::new("bot", User::new("42")).in_group("axis");
        assert_eq!(resolve_context(&adapter.message_from_line("hi")), "group_axis");
    }

    #[tokio::test]
    async fn send_message_returns_an_id() {
        let adapter = ConsoleAdapter::new("bot", User::new("42"));
        assert!(!adapter.send_message("private_42", "hello").await.unwrap().is_empty());
        assert_eq!(adapter.bot_info().name, "bot");
    }
}
