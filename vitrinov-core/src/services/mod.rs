//! Service layer - business logic orchestration
//!
//! Services coordinate domain logic and port interactions. Every resource
//! service goes through [`ApiClient`], which runs the token guard first.

pub mod api_client;
mod auth;
mod bank_accounts;
mod clients;
pub mod logging;
mod reports;
pub mod sequencing;
pub mod session;
pub mod token_guard;
mod transactions;

#[cfg(test)]
pub(crate) mod testing;

pub use api_client::{ApiClient, Operation};
pub use auth::AuthService;
pub use bank_accounts::BankAccountService;
pub use clients::ClientService;
pub use logging::{EntryPoint, EventCount, LogEntry, LogEvent, LoggingService};
pub use reports::{is_spreadsheet, ReportService, XLSX_MIME};
pub use sequencing::{Debouncer, RefreshCoordinator, RequestSequencer, Ticket, DEFAULT_DEBOUNCE};
pub use session::{SessionStore, SESSION_KEY};
pub use token_guard::{TokenGuard, DEFAULT_TOKEN_CHECK_PATH, SESSION_EXPIRED_MESSAGE};
pub use transactions::TransactionService;
