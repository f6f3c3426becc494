//! Context resolution - maps an event to the leaderboard scope it belongs to

use sha2::{Digest, Sha256};

use crate::domain::entities::{Message, Route};

/// Shared scope for events that carry nothing to resolve from
pub const DEFAULT_CONTEXT: &str = "default_ctx";

/// Derives the stable context id for a message.
///
/// Tiers, in order:
/// 1. routing nested under the message source (group, then user)
/// 2. routing exposed directly on the event (group, then user)
/// 3. `ctx_` plus 6 hex chars hashed from message id and timestamp
/// 4. [`DEFAULT_CONTEXT`]
pub fn resolve_context(message: &Message) -> String {
    let routed = message
        .source
        .as_ref()
        .and_then(|source| source.route())
        .or_else(|| message.routing.route());

    if let Some(route) = routed {
        return route_context(&route);
    }

    match hashed_context(message) {
        Some(id) => {
            tracing::debug!("No routing fields on message, using hashed context {}", id);
            id
        }
        None => {
            tracing::warn!("Message has no routing, id or timestamp; using {}", DEFAULT_CONTEXT);
            DEFAULT_CONTEXT.to_string()
        }
    }
}

pub fn route_context(route: &Route) -> String {
    match route {
        Route::Group(id) => format!("group_{}", id),
        Route::User(id) => format!("private_{}", id),
    }
}

/// Same id for redelivery of the same event. Needs at least one of id or timestamp.
fn hashed_context(message: &Message) -> Option<String> {
    if message.id.is_none() && message.timestamp.is_none() {
        return None;
    }
    let seed = format!(
        "{}-{}",
        message.id.as_deref().unwrap_or_default(),
        message.timestamp.map(|t| t.to_string()).unwrap_or_default()
    );
    let digest = hex::encode(Sha256::digest(seed.as_bytes()));
    Some(format!("ctx_{}", &digest[..6]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{Content, Routing};

    fn bare_message() -> Message {
        let mut msg = Message::new(Content::Empty);
        msg.id = Some("msg-1".to_string());
        msg.timestamp = Some(1_709_251_200);
        msg
    }

    #[test]
    fn direct_user_only_resolves_private() {
        let msg = bare_message().with_routing(Routing::user("u1"));
        assert_eq!(resolve_context(&msg), "private_u1");
    }

    #[test]
    fn direct_group_beats_direct_user() {
        let msg = bare_message().with_routing(Routing {
            group_id: Some("g1".into()),
            user_id: Some("u1".into()),
        });
        assert_eq!(resolve_context(&msg), "group_g1");
    }

    #[test]
    fn nested_source_beats_direct_fields() {
        let msg = bare_message()
            .with_source(Routing::user("u9"))
            .with_routing(Routing::group("g1"));
        assert_eq!(resolve_context(&msg), "private_u9");

        let msg = bare_message()
            .with_source(Routing::group("g9"))
            .with_routing(Routing::group("g1"));
        assert_eq!(resolve_context(&msg), "group_g9");
    }

    #[test]
    fn empty_source_falls_through_to_direct() {
        let msg = bare_message()
            .with_source(Routing::default())
            .with_routing(Routing::group("g1"));
        assert_eq!(resolve_context(&msg), "group_g1");
    }

    #[test]
    fn hashed_fallback_is_stable_and_distinct() {
        let first = resolve_context(&bare_message());
        let again = resolve_context(&bare_message());
        assert_eq!(first, again);
        assert!(first.starts_with("ctx_"));
        assert_eq!(first.len(), "ctx_".len() + 6);
        assert!(first["ctx_".len()..].chars().all(|c| c.is_ascii_hexdigit()));

        let mut other = bare_message();
        other.id = Some("msg-2".to_string());
        assert_ne!(resolve_context(&other), first);
    }

    #[test]
    fn nothing_to_hash_uses_default_context() {
        let mut msg = Message::new(Content::Empty);
        msg.id = None;
        msg.timestamp = None;
        assert_eq!(resolve_context(&msg), DEFAULT_CONTEXT);
    }
}
