//! Integration tests for vitrinov-core services
//!
//! A full `VitrinovContext` is assembled over a scripted transport. Network
//! IO is mocked at the trait level, but session files and the event log
//! database are real.
//!
//! Run with: cargo test --test integration_tests -- --nocapture

use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::NaiveDate;
use serde_json::{json, Value as JsonValue};
use tempfile::TempDir;

use vitrinov_core::adapters::FileSessionStorage;
use vitrinov_core::config::Config;
use vitrinov_core::domain::{ClientName, Credentials};
use vitrinov_core::ports::{ApiRequest, ApiResponse, ApiTransport, Method};
use vitrinov_core::services::SESSION_EXPIRED_MESSAGE;
use vitrinov_core::{ApiResult, DateRange, EntryPoint, LoggingService, VitrinovContext};

// ============================================================================
// Test Helpers
// ============================================================================

/// Answers from a route table and records what was sent
#[derive(Default)]
struct ScriptedTransport {
    routes: Mutex<Vec<(Method, String, u16, JsonValue)>>,
    sent: Mutex<Vec<ApiRequest>>,
}

impl ScriptedTransport {
    fn on(&self, method: Method, path: &str, status: u16, body: JsonValue) {
        self.routes
            .lock()
            .unwrap()
            .push((method, path.to_string(), status, body));
    }

    fn sent(&self) -> Vec<ApiRequest> {
        self.sent.lock().unwrap().clone()
    }

    fn sent_to(&self, path: &str) -> Vec<ApiRequest> {
        self.sent().into_iter().filter(|r| r.path == path).collect()
    }
}

impl ApiTransport for ScriptedTransport {
    fn execute(&self, request: &ApiRequest) -> vitrinov_core::domain::result::Result<ApiResponse> {
        self.sent.lock().unwrap().push(request.clone());
        let routes = self.routes.lock().unwrap();
        let reply = routes
            .iter()
            .rev()
            .find(|(m, p, _, _)| *m == request.method && *p == request.path);
        Ok(match reply {
            Some((_, _, status, body)) => ApiResponse::json(*status, body),
            None => ApiResponse::json(404, &json!({"message": "Endpoint not found"})),
        })
    }

    fn base_url(&self) -> &str {
        "https://api.test"
    }
}

/// Context rooted at `dir` with a real session file and event log
fn create_context(dir: &TempDir, transport: Arc<ScriptedTransport>) -> VitrinovContext {
    let config = Config::defaults(dir.path());
    let storage = Arc::new(FileSessionStorage::new(dir.path()));
    let logger = LoggingService::new(dir.path(), EntryPoint::Cli, "test")
        .expect("Failed to open log database");
    VitrinovContext::with_parts(config, transport, storage, Some(Arc::new(logger)))
}

fn may_range() -> DateRange {
    DateRange::new(
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
        NaiveDate::from_ymd_opt(2024, 5, 31).unwrap(),
    )
    .unwrap()
}

fn login(ctx: &VitrinovContext, transport: &ScriptedTransport) {
    transport.on(
        Method::Post,
        "/auth/login",
        200,
        json!({"access_token": "tok-abc", "user": {"id": 12, "name": "Ana Pérez"}}),
    );
    let credentials = Credentials::new("ana@example.com", "secreto").unwrap();
    let result = ctx.auth_service.login(&credentials);
    assert!(result.is_ok(), "login failed: {}", result.message());
}

fn events(ctx: &VitrinovContext) -> Vec<String> {
    ctx.logger
        .as_ref()
        .unwrap()
        .get_recent(100)
        .unwrap()
        .into_iter()
        .map(|e| e.event)
        .collect()
}

// ============================================================================
// Session lifecycle
// ============================================================================

#[test]
fn test_login_persists_session_for_next_process() {
    let dir = TempDir::new().unwrap();
    let transport = Arc::new(ScriptedTransport::default());
    let ctx = create_context(&dir, Arc::clone(&transport));
    login(&ctx, &transport);

    // Second context over the same directory, like a second CLI run
    let second = create_context(&dir, Arc::new(ScriptedTransport::default()));
    let session = second.session.get_cached();
    assert_eq!(session.token(), Some("tok-abc"));
    assert_eq!(session.user_id(), "12");
}

#[test]
fn test_guarded_request_carries_bearer_token() {
    let dir = TempDir::new().unwrap();
    let transport = Arc::new(ScriptedTransport::default());
    let ctx = create_context(&dir, Arc::clone(&transport));
    login(&ctx, &transport);

    transport.on(Method::Get, "/auth/check-token", 200, json!({}));
    transport.on(
        Method::Get,
        "/transactions/filter",
        200,
        json!({
            "summary": {"ingresos": "25.50", "egresos": "0", "saldo": "25.50"},
            "transactions": [{"id": 1, "amount": "25.50", "transaction_date": "2024-05-04"}]
        }),
    );

    let page = ctx
        .transaction_service
        .filter(&may_range(), None)
        .into_data()
        .unwrap();
    assert_eq!(page.transactions.len(), 1);

    let check = &transport.sent_to("/auth/check-token")[0];
    let filter = &transport.sent_to("/transactions/filter")[0];
    assert_eq!(check.bearer.as_deref(), Some("tok-abc"));
    assert_eq!(filter.bearer.as_deref(), Some("tok-abc"));
}

#[test]
fn test_expired_token_clears_session_on_disk() {
    let dir = TempDir::new().unwrap();
    let transport = Arc::new(ScriptedTransport::default());
    let ctx = create_context(&dir, Arc::clone(&transport));
    login(&ctx, &transport);

    transport.on(Method::Get, "/auth/check-token", 401, json!({}));

    let result = ctx.client_service.list();
    assert_eq!(result, ApiResult::expired(SESSION_EXPIRED_MESSAGE));
    assert!(transport.sent_to("/clients/list").is_empty());

    // Forced re-authentication: memory and disk are both cleared
    assert!(!ctx.session.get_cached().is_authenticated());
    let second = create_context(&dir, Arc::new(ScriptedTransport::default()));
    assert!(!second.session.get_cached().is_authenticated());

    assert!(events(&ctx).contains(&"session_expired".to_string()));
}

#[test]
fn test_no_session_is_expired_without_network() {
    let dir = TempDir::new().unwrap();
    let transport = Arc::new(ScriptedTransport::default());
    let ctx = create_context(&dir, Arc::clone(&transport));

    let name = ClientName::new("Tienda Luna").unwrap();
    assert!(ctx.client_service.add(&name).token_expired());
    assert!(ctx.report_service.notifications(&may_range()).token_expired());
    assert!(transport.sent().is_empty());
}

#[test]
fn test_logout_then_guarded_call_is_expired() {
    let dir = TempDir::new().unwrap();
    let transport = Arc::new(ScriptedTransport::default());
    let ctx = create_context(&dir, Arc::clone(&transport));
    login(&ctx, &transport);

    ctx.auth_service.logout().unwrap();
    let before = transport.sent().len();
    assert!(ctx.bank_account_service.list("4").token_expired());
    assert_eq!(transport.sent().len(), before);
}

// ============================================================================
// Failure reporting
// ============================================================================

#[test]
fn test_server_failure_message_and_log() {
    let dir = TempDir::new().unwrap();
    let transport = Arc::new(ScriptedTransport::default());
    let ctx = create_context(&dir, Arc::clone(&transport));
    login(&ctx, &transport);

    transport.on(
        Method::Delete,
        "/clients/delete/9",
        409,
        json!({"message": "El emprendedor tiene transacciones"}),
    );

    let result = ctx.client_service.delete("9");
    assert_eq!(result, ApiResult::failure("El emprendedor tiene transacciones"));

    let logger = ctx.logger.as_ref().unwrap();
    let errors = logger.get_errors(10).unwrap();
    let failed = errors
        .iter()
        .find(|e| e.event == "request_failed")
        .expect("request_failed should be logged");
    assert_eq!(failed.operation.as_deref(), Some("clients.delete"));
    assert_eq!(failed.status, Some(409));
}

#[test]
fn test_log_never_contains_token() {
    let dir = TempDir::new().unwrap();
    let transport = Arc::new(ScriptedTransport::default());
    let ctx = create_context(&dir, Arc::clone(&transport));
    login(&ctx, &transport);
    transport.on(Method::Get, "/auth/check-token", 403, json!({}));
    let _ = ctx.transaction_service.delete("1");

    let entries = ctx.logger.as_ref().unwrap().get_recent(100).unwrap();
    assert!(!entries.is_empty());
    let dump = serde_json::to_string(&entries).unwrap();
    assert!(!dump.contains("tok-abc"));
    assert!(!dump.contains("ana@example.com"));
}

// ============================================================================
// Context wiring
// ============================================================================

#[test]
fn test_refresh_coordinator_uses_configured_debounce() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("settings.json"), r#"{"searchDebounceMs": 150}"#).unwrap();

    let config = Config::load(dir.path()).unwrap();
    let ctx = VitrinovContext::with_parts(
        config,
        Arc::new(ScriptedTransport::default()),
        Arc::new(FileSessionStorage::new(dir.path())),
        None,
    );

    let coordinator = ctx.refresh_coordinator::<Vec<String>>();
    assert_eq!(coordinator.debouncer().quiet_period(), Duration::from_millis(150));
}

#[test]
fn test_reports_land_in_configured_cache_dir() {
    let dir = TempDir::new().unwrap();
    let ctx = create_context(&dir, Arc::new(ScriptedTransport::default()));
    assert_eq!(ctx.report_service.cache_dir(), dir.path().join("cache"));
}
