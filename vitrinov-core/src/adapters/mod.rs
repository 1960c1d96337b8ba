//! Adapter implementations
//!
//! Adapters implement the port traits with concrete technologies:
//! - reqwest blocking client for the ApiTransport port
//! - JSON files (or memory) for the SessionStorage port

pub mod file_storage;
pub mod http;

#[cfg(test)]
pub mod api_mock;

pub use file_storage::{FileSessionStorage, MemorySessionStorage};
pub use http::HttpTransport;
