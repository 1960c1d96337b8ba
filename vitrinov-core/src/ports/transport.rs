//! HTTP transport port
//!
//! Defines the interface the API client uses to reach the backend. The
//! reqwest adapter implements it for real traffic; tests script it.

use std::path::PathBuf;

use serde_json::Value as JsonValue;

use crate::domain::result::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

/// Value of a multipart form field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormValue {
    Text(String),
    File {
        path: PathBuf,
        file_name: String,
        mime_type: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub name: String,
    pub value: FormValue,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum RequestBody {
    #[default]
    Empty,
    Json(JsonValue),
    Multipart(Vec<FormField>),
}

/// A request relative to the configured API base URL
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Path starting with `/`
    pub path: String,
    pub query: Vec<(String, String)>,
    pub bearer: Option<String>,
    pub accept: Option<String>,
    pub body: RequestBody,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            bearer: None,
            accept: None,
            body: RequestBody::Empty,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::Put, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    pub fn query(mut self, key: &str, value: impl Into<String>) -> Self {
        self.query.push((key.to_string(), value.into()));
        self
    }

    pub fn bearer(mut self, token: impl Into<String>) -> Self {
        self.bearer = Some(token.into());
        self
    }

    pub fn accept(mut self, mime: impl Into<String>) -> Self {
        self.accept = Some(mime.into());
        self
    }

    pub fn json(mut self, body: JsonValue) -> Self {
        self.body = RequestBody::Json(body);
        self
    }

    pub fn text_field(mut self, name: &str, value: impl Into<String>) -> Self {
        self.push_field(FormField {
            name: name.to_string(),
            value: FormValue::Text(value.into()),
        });
        self
    }

    pub fn file_field(mut self, name: &str, path: PathBuf, file_name: &str, mime_type: &str) -> Self {
        self.push_field(FormField {
            name: name.to_string(),
            value: FormValue::File {
                path,
                file_name: file_name.to_string(),
                mime_type: mime_type.to_string(),
            },
        });
        self
    }

    fn push_field(&mut self, field: FormField) {
        match &mut self.body {
            RequestBody::Multipart(fields) => fields.push(field),
            _ => self.body = RequestBody::Multipart(vec![field]),
        }
    }

    /// Value of a query parameter, if set
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Raw response: status plus undecoded body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn json(status: u16, body: &JsonValue) -> Self {
        Self::new(status, body.to_string())
    }

    pub fn is_success(&self) -> bool {
        is_success_status(self.status)
    }

    /// Body as JSON, `{}` when empty or not JSON
    pub fn json_body(&self) -> JsonValue {
        parse_body(&self.body)
    }
}

/// Statuses treated as success by every resource operation
pub fn is_success_status(status: u16) -> bool {
    matches!(status, 200 | 201 | 202)
}

pub const INVALID_ID_MESSAGE: &str = "Identificador inválido.";

/// `{prefix}/{id}` for a single resource
///
/// The id must stay one path segment: empty ids, `.`, `..` and ids holding
/// separators, `%` or whitespace are refused.
pub fn resource_path(prefix: &str, id: &str) -> Result<String> {
    let id = id.trim();
    let leaves_segment = |c: char| {
        matches!(c, '/' | '\\' | '?' | '#' | '%') || c.is_whitespace() || c.is_control()
    };
    if id.is_empty() || id == "." || id == ".." || id.contains(leaves_segment) {
        return Err(Error::validation(INVALID_ID_MESSAGE));
    }
    Ok(format!("{}/{}", prefix, id))
}

/// Never fails: unparseable or empty bodies read as an empty object
pub fn parse_body(body: &[u8]) -> JsonValue {
    serde_json::from_slice(body).unwrap_or_else(|_| JsonValue::Object(Default::default()))
}

/// Transport trait
///
/// Implementations perform one HTTP exchange. Any HTTP status is a
/// successful exchange; `Err` is reserved for network failures
/// (timeout, refused connection, unreadable body).
pub trait ApiTransport: Send + Sync {
    fn execute(&self, request: &ApiRequest) -> Result<ApiResponse>;

    /// Base URL requests are resolved against
    fn base_url(&self) -> &str;
}
