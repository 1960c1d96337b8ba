//! Guarded request runner shared by every resource service
//!
//! Every authenticated operation goes through [`ApiClient::send`], which
//! runs the token guard before sending the bearer request and folds the
//! response into an [`ApiResult`].

use std::sync::Arc;

use serde_json::Value as JsonValue;

use crate::domain::result::ApiResult;
use crate::domain::wire::server_message;
use crate::ports::{ApiRequest, ApiResponse, ApiTransport};
use crate::services::logging::{LogEvent, LoggingService};
use crate::services::session::SessionStore;
use crate::services::token_guard::TokenGuard;

/// Describes one resource operation for messages and logs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operation {
    /// Dotted name used in logs, e.g. `transactions.add`
    pub name: &'static str,
    /// Used when the server sends no `message` on success
    pub success_message: &'static str,
    /// Used when the server sends no `message` on failure
    pub failure_message: &'static str,
}

pub struct ApiClient {
    transport: Arc<dyn ApiTransport>,
    session: Arc<SessionStore>,
    guard: TokenGuard,
    logger: Option<Arc<LoggingService>>,
}

impl ApiClient {
    pub fn new(
        transport: Arc<dyn ApiTransport>,
        session: Arc<SessionStore>,
        token_check_path: &str,
    ) -> Self {
        Self {
            guard: TokenGuard::new(transport.clone(), token_check_path),
            transport,
            session,
            logger: None,
        }
    }

    pub fn with_logger(mut self, logger: Arc<LoggingService>) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn base_url(&self) -> &str {
        self.transport.base_url()
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn transport(&self) -> &dyn ApiTransport {
        self.transport.as_ref()
    }

    /// Logging never fails an operation
    pub(crate) fn log(&self, event: LogEvent) {
        if let Some(logger) = &self.logger {
            let _ = logger.log(event);
        }
    }

    /// Run the guarded protocol and return the raw response on success
    pub fn send(&self, op: Operation, request: ApiRequest) -> ApiResult<ApiResponse> {
        let token = self.session.token();
        let check = self.guard.ensure_token(token.as_deref());
        if check.token_expired() {
            let _ = self.session.clear();
            self.log(LogEvent::new("session_expired").with_operation(op.name));
            return ApiResult::expired(check.message());
        }

        // Guard passed, so the token is present
        let request = match token {
            Some(token) => request.bearer(token),
            None => request,
        };

        let response = match self.transport.execute(&request) {
            Ok(response) => response,
            Err(e) => {
                self.log(
                    LogEvent::new("network_error")
                        .with_operation(op.name)
                        .with_error(e.to_string()),
                );
                return ApiResult::failure(op.failure_message);
            }
        };

        let message = server_message(&response.json_body());
        if response.is_success() {
            ApiResult::success(
                response,
                message.unwrap_or_else(|| op.success_message.to_string()),
            )
        } else {
            let message = message.unwrap_or_else(|| op.failure_message.to_string());
            self.log(
                LogEvent::new("request_failed")
                    .with_operation(op.name)
                    .with_status(response.status)
                    .with_error(message.clone()),
            );
            ApiResult::failure(message)
        }
    }

    /// Like [`ApiClient::send`], mapping the parsed JSON body on success
    pub fn execute<T>(
        &self,
        op: Operation,
        request: ApiRequest,
        parse: impl FnOnce(&JsonValue) -> T,
    ) -> ApiResult<T> {
        self.send(op, request)
            .map(|response| parse(&response.json_body()))
    }

    /// For mutations whose success carries only a message
    pub fn execute_message(&self, op: Operation, request: ApiRequest) -> ApiResult<()> {
        self.execute(op, request, |_| ())
    }
}
