//! Port definitions (hexagonal architecture)
//!
//! Ports define the interfaces for external dependencies. The core domain
//! depends only on these traits, not on concrete implementations.

mod session_storage;
pub mod transport;

pub use session_storage::SessionStorage;
pub use transport::{
    resource_path, ApiRequest, ApiResponse, ApiTransport, FormField, FormValue, Method,
    RequestBody, INVALID_ID_MESSAGE,
};
