use super::User;
use chrono::Utc;
use serde_json::Value;

/// Message content
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    Text(String),
    Command {
        name: String,
        args: Vec<String>,
        /// Everything after the command name, line breaks and spacing intact
        body: String,
    },
    Empty,
}

impl Content {
    pub fn text(&self) -> Option<&str> {
        match self {
            Content::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_command(&self) -> bool {
        matches!(self, Content::Command { .. })
    }

    pub fn command_body(&self) -> Option<&str> {
        match self {
            Content::Command { body, .. } => Some(body),
            _ => None,
        }
    }
}

/// A conversation a message can be routed back to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Group(String),
    User(String),
}

/// Routing fields as exposed by one layer of a platform event
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Routing {
    pub group_id: Option<String>,
    pub user_id: Option<String>,
}

impl Routing {
    pub fn group(id: impl Into<String>) -> Self {
        Self {
            group_id: Some(id.into()),
            user_id: None,
        }
    }

    pub fn user(id: impl Into<String>) -> Self {
        Self {
            group_id: None,
            user_id: Some(id.into()),
        }
    }

    /// The most specific route these fields carry. Empty ids count as absent.
    pub fn route(&self) -> Option<Route> {
        non_empty(&self.group_id)
            .map(Route::Group)
            .or_else(|| non_empty(&self.user_id).map(Route::User))
    }

    fn from_json(value: &Value) -> Self {
        Self {
            group_id: id_field(value, &["group_id", "guild_id"]),
            user_id: id_field(value, &["user_id"]),
        }
    }
}

fn non_empty(field: &Option<String>) -> Option<String> {
    field
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Reads the first present key as an id; platforms send ids as strings or numbers.
fn id_field(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match value.get(*key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// Represents an incoming or outgoing message
#[derive(Debug, Clone)]
pub struct Message {
    pub id: Option<String>,
    pub sender: Option<User>,
    pub content: Content,
    /// Unix seconds
    pub timestamp: Option<i64>,
    /// Routing nested under the platform's message source, when present
    pub source: Option<Routing>,
    /// Routing exposed directly on the event
    pub routing: Routing,
}

impl Message {
    pub fn new(content: Content) -> Self {
        Self {
            id: Some(uuid::Uuid::new_v4().to_string()),
            sender: None,
            content,
            timestamp: Some(Utc::now().timestamp()),
            source: None,
            routing: Routing::default(),
        }
    }

    pub fn from_text(text: impl Into<String>) -> Self {
        Self::new(Content::Text(text.into()))
    }

    pub fn from_command(name: impl Into<String>, args: Vec<String>) -> Self {
        let body = args.join(" ");
        Self::new(Content::Command { name: name.into(), args, body })
    }

    /// Normalizes a raw platform event.
    ///
    /// Recognized shapes: `message.source.{group_id,user_id}` for the nested
    /// source, top-level `group_id`/`user_id`, `message_id` or `id`, `time` or
    /// `timestamp`, and a `sender` object with `user_id`/`id` and
    /// `nickname`/`card`/`name`. Unknown fields are ignored.
    pub fn from_json(raw: &Value) -> Self {
        let source = raw
            .get("message")
            .and_then(|m| m.get("source"))
            .filter(|s| s.is_object())
            .map(Routing::from_json);

        let sender = raw.get("sender").and_then(|s| {
            let id = id_field(s, &["user_id", "id"])?;
            let mut user = User::new(id);
            user.nickname = id_field(s, &["card", "nickname"]);
            user.username = id_field(s, &["name", "username"]);
            Some(user)
        });

        let timestamp = ["time", "timestamp"].iter().find_map(|key| match raw.get(*key)? {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        });

        let text = ["message_str", "raw_message", "text"]
            .iter()
            .find_map(|key| raw.get(*key).and_then(Value::as_str))
            .map(str::to_string);

        Self {
            id: id_field(raw, &["message_id", "id"]),
            sender,
            content: text.map(Content::Text).unwrap_or(Content::Empty),
            timestamp,
            source,
            routing: Routing::from_json(raw),
        }
    }

    pub fn with_sender(mut self, user: User) -> Self {
        self.sender = Some(user);
        self
    }

    pub fn with_source(mut self, source: Routing) -> Self {
        self.source = Some(source);
        self
    }

    pub fn with_routing(mut self, routing: Routing) -> Self {
        self.routing = routing;
        self
    }

    pub fn sender_id(&self) -> Option<&str> {
        self.sender.as_ref().map(|u| u.id.as_str())
    }

    pub fn sender_name(&self) -> String {
        self.sender
            .as_ref()
            .map(User::display_name)
            .unwrap_or_default()
    }
}
