//! Token guard - server-side validity check run before every
//! authenticated request

use std::sync::Arc;

use crate::domain::result::ApiResult;
use crate::domain::wire::server_message;
use crate::ports::{ApiRequest, ApiTransport};

/// Shown whenever the session has to be re-established
pub const SESSION_EXPIRED_MESSAGE: &str = "Tu sesión expiró. Inicia sesión nuevamente.";

/// Default lightweight authenticated endpoint
pub const DEFAULT_TOKEN_CHECK_PATH: &str = "/auth/check-token";

pub struct TokenGuard {
    transport: Arc<dyn ApiTransport>,
    check_path: String,
}

impl TokenGuard {
    pub fn new(transport: Arc<dyn ApiTransport>, check_path: impl Into<String>) -> Self {
        Self {
            transport,
            check_path: check_path.into(),
        }
    }

    /// `Success(())` when the token may be used, `Expired` otherwise.
    ///
    /// A missing or blank token is expired without touching the network.
    /// Only 401/403 from the check endpoint mean expired; other statuses
    /// and network errors let the caller proceed so the real request can
    /// report its own failure.
    pub fn ensure_token(&self, token: Option<&str>) -> ApiResult<()> {
        let token = match token.map(str::trim).filter(|t| !t.is_empty()) {
            Some(token) => token,
            None => return ApiResult::expired(SESSION_EXPIRED_MESSAGE),
        };

        let request = ApiRequest::get(self.check_path.as_str()).bearer(token);
        match self.transport.execute(&request) {
            Ok(response) if matches!(response.status, 401 | 403) => ApiResult::expired(
                server_message(&response.json_body())
                    .unwrap_or_else(|| SESSION_EXPIRED_MESSAGE.to_string()),
            ),
            Ok(_) | Err(_) => ApiResult::success((), ""),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::{RecordingTransport, Reply};
    use serde_json::json;

    fn guard(transport: &Arc<RecordingTransport>) -> TokenGuard {
        TokenGuard::new(transport.clone(), DEFAULT_TOKEN_CHECK_PATH)
    }

    #[test]
    fn test_missing_token_is_expired_without_request() {
        let transport = Arc::new(RecordingTransport::new());
        let guard = guard(&transport);

        assert!(guard.ensure_token(None).token_expired());
        assert!(guard.ensure_token(Some("  ")).token_expired());
        assert!(transport.requests().is_empty());
    }

    #[test]
    fn test_unauthorized_is_expired() {
        for status in [401, 403] {
            let transport = Arc::new(RecordingTransport::new());
            transport.on_token_check(Reply::status(status));
            let result = guard(&transport).ensure_token(Some("tok"));
            assert!(result.token_expired(), "status {}", status);
            assert_eq!(result.message(), SESSION_EXPIRED_MESSAGE);
        }
    }

    #[test]
    fn test_server_message_is_used_when_expired() {
        let transport = Arc::new(RecordingTransport::new());
        transport.on_token_check(Reply::json(401, json!({"message": "Token vencido"})));
        let result = guard(&transport).ensure_token(Some("tok"));
        assert_eq!(result.message(), "Token vencido");
    }

    #[test]
    fn test_check_sends_bearer() {
        let transport = Arc::new(RecordingTransport::new());
        assert!(guard(&transport).ensure_token(Some("tok")).is_ok());

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].path, DEFAULT_TOKEN_CHECK_PATH);
        assert_eq!(requests[0].bearer.as_deref(), Some("tok"));
    }

    #[test]
    fn test_other_statuses_and_network_errors_pass() {
        for reply in [Reply::status(200), Reply::status(404), Reply::status(500), Reply::network_error()] {
            let transport = Arc::new(RecordingTransport::new());
            transport.on_token_check(reply);
            assert!(guard(&transport).ensure_token(Some("tok")).is_ok());
        }
    }
}
