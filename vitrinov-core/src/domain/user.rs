//! User profile as returned by the auth endpoints

use serde_json::Value as JsonValue;

/// Keys the backend has used for the user id, in lookup order
const USER_ID_KEYS: &[&str] = &["id", "user_id", "id_usuario", "idUser"];

/// Read-only view over the raw user profile stored in the session
///
/// The profile is kept as raw JSON in the session so that whatever the
/// server sends survives a save/load round-trip untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
}

impl User {
    pub fn from_json(value: &JsonValue) -> Self {
        Self {
            id: user_id(value),
            name: string_field(value, "name"),
            email: string_field(value, "email"),
        }
    }

    /// Name to greet the user with, falling back to the email
    pub fn display_name(&self) -> Option<&str> {
        self.name.as_deref().or(self.email.as_deref())
    }
}

/// Resolve the user id from any of the known keys (number or string)
pub fn user_id(value: &JsonValue) -> Option<String> {
    USER_ID_KEYS.iter().find_map(|key| match value.get(*key) {
        Some(JsonValue::Number(n)) => Some(n.to_string()),
        Some(JsonValue::String(s)) if !s.is_empty() => Some(s.clone()),
        _ => None,
    })
}

fn string_field(value: &JsonValue, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(|v| v.as_str())
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
}
