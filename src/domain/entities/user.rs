use std::fmt;

/// Represents a message sender
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct User {
    pub id: String,
    pub username: Option<String>,
    pub nickname: Option<String>,
}

impl User {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            username: None,
            nickname: None,
        }
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn with_nickname(mut self, nickname: impl Into<String>) -> Self {
        self.nickname = Some(nickname.into());
        self
    }

    /// Group nickname first, then account username, then the raw id
    pub fn display_name(&self) -> String {
        self.nickname
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .or_else(|| self.username.as_deref().filter(|n| !n.trim().is_empty()))
            .unwrap_or(self.id.as_str())
            .to_string()
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_prefers_nickname() {
        let user = User::new("42").with_username("alice").with_nickname("Al");
        assert_eq!(user.display_name(), "Al");
    }

    #[test]
    fn display_name_falls_back_to_id() {
        let user = User::new("42").with_nickname("  ");
        assert_eq!(user.display_name(), "42");
    }
}
