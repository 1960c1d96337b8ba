//! Scripted transport for service tests

use std::sync::Mutex;

use serde_json::{json, Value as JsonValue};

use crate::domain::result::{Error, Result};
use crate::ports::{ApiRequest, ApiResponse, ApiTransport, Method};
use crate::services::token_guard::DEFAULT_TOKEN_CHECK_PATH;

pub const TEST_BASE_URL: &str = "https://api.test";

#[derive(Debug, Clone)]
pub enum Reply {
    Response(ApiResponse),
    NetworkError,
}

impl Reply {
    pub fn status(status: u16) -> Self {
        Self::json(status, json!({}))
    }

    pub fn json(status: u16, body: JsonValue) -> Self {
        Self::Response(ApiResponse::json(status, &body))
    }

    pub fn bytes(status: u16, body: Vec<u8>) -> Self {
        Self::Response(ApiResponse::new(status, body))
    }

    pub fn network_error() -> Self {
        Self::NetworkError
    }
}

/// Records every request and answers from a route table.
///
/// The token check answers 200 unless scripted otherwise; unknown routes
/// answer 404.
#[derive(Default)]
pub struct RecordingTransport {
    routes: Mutex<Vec<(Method, String, Reply)>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script a reply; later registrations for the same route win
    pub fn on(&self, method: Method, path: &str, reply: Reply) {
        self.routes
            .lock()
            .unwrap()
            .push((method, path.to_string(), reply));
    }

    pub fn on_token_check(&self, reply: Reply) {
        self.on(Method::Get, DEFAULT_TOKEN_CHECK_PATH, reply);
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Requests other than token checks
    pub fn resource_requests(&self) -> Vec<ApiRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.path != DEFAULT_TOKEN_CHECK_PATH)
            .collect()
    }
}

impl ApiTransport for RecordingTransport {
    fn execute(&self, request: &ApiRequest) -> Result<ApiResponse> {
        self.requests.lock().unwrap().push(request.clone());

        let reply = self
            .routes
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(m, p, _)| *m == request.method && *p == request.path)
            .map(|(_, _, reply)| reply.clone());

        match reply {
            Some(Reply::Response(response)) => Ok(response),
            Some(Reply::NetworkError) => Err(Error::transport("Unable to connect")),
            None if request.path == DEFAULT_TOKEN_CHECK_PATH => Ok(ApiResponse::json(200, &json!({}))),
            None => Ok(ApiResponse::json(404, &json!({}))),
        }
    }

    fn base_url(&self) -> &str {
        TEST_BASE_URL
    }
}
