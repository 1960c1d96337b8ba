//! Result and error types for the core library

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use thiserror::Error;

/// Core library error type
#[derive(Error, Debug)]
pub enum Error {
    #[error("{0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a validation error (message is shown to the user as-is)
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Create a transport error
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }
}

/// Core library result type
pub type Result<T> = std::result::Result<T, Error>;

/// Outcome of an authenticated API operation
///
/// Exactly one variant is active. Callers check [`ApiResult::token_expired`]
/// first (it forces re-authentication), then [`ApiResult::is_ok`].
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResult<T> {
    Success { data: T, message: String },
    Expired { message: String },
    Failure { message: String },
}

impl<T> ApiResult<T> {
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self::Success {
            data,
            message: message.into(),
        }
    }

    pub fn expired(message: impl Into<String>) -> Self {
        Self::Expired {
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self::Failure {
            message: message.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn token_expired(&self) -> bool {
        matches!(self, Self::Expired { .. })
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Success { message, .. }
            | Self::Expired { message }
            | Self::Failure { message } => message,
        }
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Success { data, .. } => Some(data),
            _ => None,
        }
    }

    pub fn into_data(self) -> Option<T> {
        match self {
            Self::Success { data, .. } => Some(data),
            _ => None,
        }
    }

    /// Transform the success payload, leaving failures untouched
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ApiResult<U> {
        match self {
            Self::Success { data, message } => ApiResult::Success {
                data: f(data),
                message,
            },
            Self::Expired { message } => ApiResult::Expired { message },
            Self::Failure { message } => ApiResult::Failure { message },
        }
    }

    /// Re-type a non-success result. Returns `None` for `Success`.
    pub fn forward<U>(&self) -> Option<ApiResult<U>> {
        match self {
            Self::Success { .. } => None,
            Self::Expired { message } => Some(ApiResult::expired(message.clone())),
            Self::Failure { message } => Some(ApiResult::failure(message.clone())),
        }
    }
}

/// Serializes as `{ ok, tokenExpired, message, data? }`
impl<T: Serialize> Serialize for ApiResult<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let len = if self.is_ok() { 4 } else { 3 };
        let mut state = serializer.serialize_struct("ApiResult", len)?;
        state.serialize_field("ok", &self.is_ok())?;
        state.serialize_field("tokenExpired", &self.token_expired())?;
        state.serialize_field("message", self.message())?;
        if let Self::Success { data, .. } = self {
            state.serialize_field("data", data)?;
        }
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_variant() {
        let result = ApiResult::success(42, "listo");
        assert!(result.is_ok());
        assert!(!result.token_expired());
        assert_eq!(result.data(), Some(&42));
        assert_eq!(result.message(), "listo");
    }

    #[test]
    fn test_expired_is_not_ok() {
        let result: ApiResult<i32> = ApiResult::expired("Tu sesión expiró");
        assert!(!result.is_ok());
        assert!(result.token_expired());
        assert!(result.data().is_none());
    }

    #[test]
    fn test_map_preserves_failure() {
        let result: ApiResult<i32> = ApiResult::failure("boom");
        let mapped = result.map(|n| n * 2);
        assert_eq!(mapped, ApiResult::failure("boom"));
    }

    #[test]
    fn test_serialized_shape() {
        let ok = serde_json::to_value(ApiResult::success(vec![1, 2], "")).unwrap();
        assert_eq!(
            ok,
            serde_json::json!({"ok": true, "tokenExpired": false, "message": "", "data": [1, 2]})
        );

        let expired = serde_json::to_value(ApiResult::<()>::expired("x")).unwrap();
        assert_eq!(
            expired,
            serde_json::json!({"ok": false, "tokenExpired": true, "message": "x"})
        );
    }

    #[test]
    fn test_validation_error_message_is_verbatim() {
        let err = Error::validation("Ingresa una cantidad válida.");
        assert_eq!(err.to_string(), "Ingresa una cantidad válida.");
    }
}
