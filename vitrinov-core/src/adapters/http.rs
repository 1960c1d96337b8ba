//! Vitrinov backend HTTP transport (reqwest, blocking)

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::blocking::multipart::{Form, Part};
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::{ACCEPT, AUTHORIZATION};

use crate::domain::result::{Error as DomainError, Result as DomainResult};
use crate::ports::{ApiRequest, ApiResponse, ApiTransport, FormField, FormValue, Method, RequestBody};

/// Blocking HTTP client bound to one API host
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl HttpTransport {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = base_url.trim().trim_end_matches('/');
        if base_url.is_empty() {
            anyhow::bail!("API base URL cannot be empty");
        }

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("vitrinov/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.to_string(),
            timeout,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn build(&self, request: &ApiRequest) -> DomainResult<RequestBuilder> {
        let url = self.url(&request.path);
        let mut builder = match request.method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
            Method::Put => self.client.put(&url),
            Method::Delete => self.client.delete(&url),
        };

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(token) = &request.bearer {
            builder = builder.header(AUTHORIZATION, format!("Bearer {}", token));
        }
        if let Some(accept) = &request.accept {
            builder = builder.header(ACCEPT, accept.as_str());
        }

        builder = match &request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(body) => builder.json(body),
            RequestBody::Multipart(fields) => builder.multipart(build_form(fields)?),
        };

        Ok(builder)
    }

    /// Convert reqwest errors to user-friendly messages
    fn map_request_error(&self, error: reqwest::Error) -> DomainError {
        if error.is_timeout() {
            DomainError::transport(format!(
                "Connection timed out after {} seconds",
                self.timeout.as_secs()
            ))
        } else if error.is_connect() {
            DomainError::transport("Unable to connect to the Vitrinov servers")
        } else {
            DomainError::transport(format!("Request failed: {}", error))
        }
    }
}

fn build_form(fields: &[FormField]) -> DomainResult<Form> {
    let mut form = Form::new();
    for field in fields {
        form = match &field.value {
            FormValue::Text(text) => form.text(field.name.clone(), text.clone()),
            FormValue::File {
                path,
                file_name,
                mime_type,
            } => {
                let bytes = std::fs::read(path)?;
                let part = Part::bytes(bytes)
                    .file_name(file_name.clone())
                    .mime_str(mime_type)
                    .map_err(|e| DomainError::transport(format!("Invalid attachment type: {}", e)))?;
                form.part(field.name.clone(), part)
            }
        };
    }
    Ok(form)
}

impl ApiTransport for HttpTransport {
    fn execute(&self, request: &ApiRequest) -> DomainResult<ApiResponse> {
        let response = self
            .build(request)?
            .send()
            .map_err(|e| self.map_request_error(e))?;

        let status = response.status().as_u16();
        let body = response.bytes().map_err(|e| self.map_request_error(e))?;

        Ok(ApiResponse::new(status, body.to_vec()))
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }
}
