//! Keyword auto-reply plugin

use std::sync::Arc;

use crate::application::errors::{BotError, CommandError};
use crate::application::services::{KeywordService, KeywordTable};
use crate::domain::entities::{Command, Message};
use crate::domain::traits::Store;
use crate::infrastructure::config::Config;
use crate::infrastructure::storage::JsonStore;
use crate::plugins::Plugin;

pub const PLUGIN_NAME: &str = "keyword_reply";
pub const DATA_FILE: &str = "keywords.json";

pub struct KeywordPlugin<S> {
    keywords: Arc<KeywordService<S>>,
    admins: Arc<Vec<String>>,
}

impl KeywordPlugin<JsonStore<KeywordTable>> {
    /// Plugin backed by `<data-dir>/keyword_reply/keywords.json`
    pub fn from_config(config: &Config) -> Self {
        let store = JsonStore::new(config.plugin_dir(PLUGIN_NAME).join(DATA_FILE));
        if config.keyword_reply.admins.is_empty() {
            tracing::warn!("No keyword admins configured; keyword rules are read-only");
        }
        Self::new(KeywordService::new(store), config.keyword_reply.admins.clone())
    }
}

impl<S: Store<KeywordTable>> KeywordPlugin<S> {
    pub fn new(service: KeywordService<S>, admins: Vec<String>) -> Self {
        Self {
            keywords: Arc::new(service),
            admins: Arc::new(admins),
        }
    }
}

impl<S: Store<KeywordTable> + 'static> Plugin for KeywordPlugin<S> {
    fn name(&self) -> &str {
        PLUGIN_NAME
    }

    fn description(&self) -> &str {
        "Replies when a message matches a keyword"
    }

    fn commands(&self) -> Vec<Command> {
        let add = {
            let keywords = Arc::clone(&self.keywords);
            let admins = Arc::clone(&self.admins);
            Command::new("kw-add")
                .with_description("Add or replace a keyword reply (admin)")
                .with_usage("/kw-add <keyword> <reply>")
                .with_aliases(["添加关键词"])
                .with_handler(move |msg, _| {
                    require_admin(&admins, msg)?;
                    // The reply is stored as typed, line breaks included
                    let (keyword, reply) = msg
                        .content
                        .command_body()
                        .and_then(|body| body.split_once(char::is_whitespace))
                        .ok_or_else(|| {
                            CommandError::InvalidArgs("usage: /kw-add <keyword> <reply>".to_string())
                        })?;
                    let replaced = keywords.add(keyword, reply).map_err(into_command_error)?;
                    Ok(if replaced {
                        format!("✅ Updated reply for '{}'", keyword.trim())
                    } else {
                        format!("✅ Added reply for '{}'", keyword.trim())
                    })
                })
        };

        let delete = {
            let keywords = Arc::clone(&self.keywords);
            let admins = Arc::clone(&self.admins);
            Command::new("kw-del")
                .with_description("Remove a keyword reply (admin)")
                .with_usage("/kw-del <keyword>")
                .with_aliases(["删除关键词"])
                .with_handler(move |msg, args| {
                    require_admin(&admins, msg)?;
                    let keyword = args.first().ok_or_else(|| {
                        CommandError::InvalidArgs("usage: /kw-del <keyword>".to_string())
                    })?;
                    Ok(if keywords.remove(keyword).map_err(into_command_error)? {
                        format!("🗑️ Removed '{}'", keyword)
                    } else {
                        format!("No reply registered for '{}'", keyword)
                    })
                })
        };

        let list = {
            let keywords = Arc::clone(&self.keywords);
            Command::new("kw-list")
                .with_description("List keyword replies")
                .with_aliases(["关键词列表"])
                .with_handler(move |_, _| {
                    let rules = keywords.list().map_err(into_command_error)?;
                    if rules.is_empty() {
                        return Ok("No keyword replies yet".to_string());
                    }
                    let mut lines = vec!["📒 Keyword replies:".to_string()];
                    lines.extend(rules.iter().map(|(k, v)| format!("{} → {}", k, v)));
                    Ok(lines.join("\n"))
                })
        };

        vec![add, delete, list]
    }

    fn on_message(&self, message: &Message) -> Option<String> {
        self.keywords.lookup(message.content.text()?)
    }
}

fn require_admin(admins: &[String], message: &Message) -> Result<(), CommandError> {
    match message.sender_id() {
        Some(id) if admins.iter().any(|a| a == id) => Ok(()),
        _ => Err(CommandError::PermissionDenied),
    }
}

fn into_command_error(e: BotError) -> CommandError {
    match e {
        BotError::Command(e) => e,
        other => CommandError::ExecutionFailed(other.to_string()),
    }
}
