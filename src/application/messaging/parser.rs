//! Message parser - Turns text into commands or plain text

use crate::domain::entities::{Message, Content, User};

/// Parses incoming text into structured content
pub struct MessageParser {
    command_prefix: String,
}

impl MessageParser {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            command_prefix: prefix.into(),
        }
    }

    /// Build a message from raw text
    pub fn parse(&self, text: impl Into<String>, sender: Option<User>) -> Message {
        let content = self.parse_content(&text.into());
        let mut message = Message::new(content);
        message.sender = sender;
        message
    }

    /// Re-reads a text message as a command when it carries the prefix
    pub fn classify(&self, mut message: Message) -> Message {
        if let Content::Text(text) = &message.content {
            message.content = self.parse_content(text);
        }
        message
    }

    pub fn parse_content(&self, text: &str) -> Content {
        let text = text.trim();
        if text.is_empty() {
            return Content::Empty;
        }

        let cmd_text = if let Some(rest) = text.strip_prefix('/') {
            rest
        } else if let Some(rest) = text.strip_prefix(self.command_prefix.as_str()).filter(|_| !self.command_prefix.is_empty()) {
            rest
        } else {
            return Content::Text(text.to_string());
        };

        let cmd_text = cmd_text.trim_start();
        let (name, body) = cmd_text
            .split_once(char::is_whitespace)
            .map(|(name, body)| (name, body.trim_start()))
            .unwrap_or((cmd_text, ""));
        if name.is_empty() {
            return Content::Text(text.to_string());
        }

        Content::Command {
            name: name.to_string(),
            args: body.split_whitespace().map(str::to_string).collect(),
            body: body.to_string(),
        }
    }
}
