//! Vitrinov Core - session-gated client for the Vitrinov sales API
//!
//! This crate implements the core domain logic following hexagonal architecture:
//!
//! - **domain**: Entities, validated inputs and pure date/grouping helpers
//! - **ports**: Trait definitions for external dependencies (ApiTransport, SessionStorage)
//! - **services**: Session store, token guard and the resource services
//! - **adapters**: Concrete implementations (reqwest, JSON files)

pub mod domain;
pub mod ports;
pub mod services;
pub mod adapters;
pub mod config;
mod log_migrations;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;

use adapters::{FileSessionStorage, HttpTransport};
use config::Config;
use ports::{ApiTransport, SessionStorage};
use services::*;

// Re-export commonly used types at crate root
pub use domain::{
    BankAccount, Client, DateRange, Session, Transaction, TransactionPage, User,
};
pub use domain::result::{ApiResult, Error};
pub use services::{EntryPoint, LogEvent, LoggingService};

/// Main context for Vitrinov operations
///
/// Owns the one session store of the process and hands the shared API
/// client to every service.
pub struct VitrinovContext {
    pub config: Config,
    pub session: Arc<SessionStore>,
    pub api_client: Arc<ApiClient>,
    pub logger: Option<Arc<LoggingService>>,
    pub auth_service: AuthService,
    pub transaction_service: TransactionService,
    pub client_service: ClientService,
    pub bank_account_service: BankAccountService,
    pub report_service: ReportService,
}

impl VitrinovContext {
    /// Create a context backed by the real HTTP API and the on-disk session
    pub fn new(data_dir: &Path, entry_point: EntryPoint) -> Result<Self> {
        let config = Config::load(data_dir)?;
        let transport = Arc::new(HttpTransport::new(
            &config.api_base_url,
            config.request_timeout,
        )?);
        let storage = Arc::new(FileSessionStorage::new(data_dir));

        // Logging must never block the app
        let logger = LoggingService::new(data_dir, entry_point, env!("CARGO_PKG_VERSION"))
            .ok()
            .map(Arc::new);

        Ok(Self::with_parts(config, transport, storage, logger))
    }

    /// Assemble a context from explicit adapters
    ///
    /// The persisted session is loaded into memory before any service runs.
    pub fn with_parts(
        config: Config,
        transport: Arc<dyn ApiTransport>,
        storage: Arc<dyn SessionStorage>,
        logger: Option<Arc<LoggingService>>,
    ) -> Self {
        let session = Arc::new(SessionStore::new(storage));
        session.load();

        let mut api_client = ApiClient::new(transport, Arc::clone(&session), &config.token_check_path);
        if let Some(logger) = &logger {
            api_client = api_client.with_logger(Arc::clone(logger));
        }
        let api_client = Arc::new(api_client);

        Self {
            auth_service: AuthService::new(Arc::clone(&api_client)),
            transaction_service: TransactionService::new(Arc::clone(&api_client)),
            client_service: ClientService::new(Arc::clone(&api_client)),
            bank_account_service: BankAccountService::new(Arc::clone(&api_client)),
            report_service: ReportService::new(Arc::clone(&api_client), config.cache_dir.clone()),
            config,
            session,
            api_client,
            logger,
        }
    }

    /// Debounced, sequenced refresh state for one search-driven view
    pub fn refresh_coordinator<T: Clone>(&self) -> RefreshCoordinator<T> {
        RefreshCoordinator::new(self.config.search_debounce)
    }
}
