//! Login, registration and logout (the only unguarded calls)

use std::sync::Arc;

use crate::domain::result::{ApiResult, Result};
use crate::domain::wire::server_message;
use crate::domain::{Credentials, Registration, Session};
use crate::ports::ApiRequest;
use crate::services::api_client::ApiClient;
use crate::services::logging::LogEvent;

const LOGIN_FAILED: &str = "No fue posible iniciar sesión.";
const REGISTER_FAILED: &str = "No fue posible registrar el usuario.";

pub struct AuthService {
    client: Arc<ApiClient>,
}

impl AuthService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// `POST /auth/login`; on 200/201 with an `access_token` the session
    /// is persisted before returning.
    pub fn login(&self, credentials: &Credentials) -> ApiResult<Session> {
        let request = ApiRequest::post("/auth/login").json(credentials.to_json());
        let response = match self.client.transport().execute(&request) {
            Ok(response) => response,
            Err(e) => {
                self.client
                    .log(LogEvent::new("network_error").with_operation("auth.login").with_error(e.to_string()));
                return ApiResult::failure(LOGIN_FAILED);
            }
        };

        let body = response.json_body();
        let message = server_message(&body);
        let token = body
            .get("access_token")
            .and_then(|t| t.as_str())
            .filter(|t| !t.trim().is_empty());

        match (response.status, token) {
            (200 | 201, Some(token)) => {
                let user = body.get("user").filter(|u| !u.is_null()).cloned();
                match self.client.session().save(token, user) {
                    Ok(session) => {
                        self.client.log(LogEvent::new("login_succeeded").with_status(response.status));
                        ApiResult::success(
                            session,
                            message.unwrap_or_else(|| "Autenticación exitosa".to_string()),
                        )
                    }
                    Err(e) => {
                        self.client.log(
                            LogEvent::new("login_failed")
                                .with_operation("session.save")
                                .with_error(e.to_string()),
                        );
                        ApiResult::failure("No fue posible guardar la sesión.")
                    }
                }
            }
            (status, _) => {
                let message = match status {
                    200 | 201 => LOGIN_FAILED.to_string(),
                    _ => message.unwrap_or_else(|| LOGIN_FAILED.to_string()),
                };
                self.client.log(
                    LogEvent::new("login_failed")
                        .with_status(status)
                        .with_error(message.clone()),
                );
                ApiResult::failure(message)
            }
        }
    }

    /// `POST /auth/register`; any 2xx is success
    pub fn register(&self, registration: &Registration) -> ApiResult<()> {
        let request = ApiRequest::post("/auth/register").json(registration.to_json());
        let response = match self.client.transport().execute(&request) {
            Ok(response) => response,
            Err(e) => {
                self.client.log(
                    LogEvent::new("network_error")
                        .with_operation("auth.register")
                        .with_error(e.to_string()),
                );
                return ApiResult::failure(REGISTER_FAILED);
            }
        };

        let message = server_message(&response.json_body());
        if (200..300).contains(&response.status) {
            ApiResult::success(
                (),
                message.unwrap_or_else(|| "Usuario registrado exitosamente".to_string()),
            )
        } else {
            let message = message.unwrap_or_else(|| REGISTER_FAILED.to_string());
            self.client.log(
                LogEvent::new("register_failed")
                    .with_status(response.status)
                    .with_error(message.clone()),
            );
            ApiResult::failure(message)
        }
    }

    /// Forget the session locally
    pub fn logout(&self) -> Result<()> {
        self.client.session().clear()?;
        self.client.log(LogEvent::new("logout"));
        Ok(())
    }
}
