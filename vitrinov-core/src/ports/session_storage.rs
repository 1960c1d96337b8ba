//! Key/value persistence port for the session record

use crate::domain::result::Result;

/// Durable string storage keyed like an async key/value store
///
/// `set_item` must not return until the value is durable.
pub trait SessionStorage: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    fn set_item(&self, key: &str, value: &str) -> Result<()>;

    /// Removing an absent key succeeds
    fn remove_item(&self, key: &str) -> Result<()>;
}
