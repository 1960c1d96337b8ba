//! Session domain model

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use super::user::{self, User};

/// Cached authentication token plus the user profile
///
/// Persisted as JSON `{ "token": ..., "user": ... }`. The null session
/// (`token` and `user` both `None`) means "not logged in".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<JsonValue>,
}

impl Session {
    pub fn new(token: impl Into<String>, user: Option<JsonValue>) -> Self {
        Self {
            token: Some(token.into()),
            user,
        }
    }

    /// The null session
    pub fn empty() -> Self {
        Self::default()
    }

    /// Token, if present and non-blank
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref().filter(|t| !t.trim().is_empty())
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    /// User id resolved from the profile (empty string when unknown)
    pub fn user_id(&self) -> String {
        self.user
            .as_ref()
            .and_then(user::user_id)
            .unwrap_or_default()
    }

    pub fn profile(&self) -> Option<User> {
        self.user.as_ref().map(User::from_json)
    }

    /// Parse a persisted record. Anything unparseable is the null session.
    pub fn from_persisted(raw: &str) -> Self {
        serde_json::from_str::<Session>(raw).unwrap_or_default()
    }
}
