//! Session store - the single owner of the auth token and user profile

use std::sync::{Arc, RwLock};

use serde_json::Value as JsonValue;

use crate::domain::result::{Error, Result};
use crate::domain::Session;
use crate::ports::SessionStorage;

/// Storage key of the persisted session record
pub const SESSION_KEY: &str = "@vitrinov/session";

/// Cached session backed by durable storage
///
/// One instance per process, shared by reference with every service.
/// Writes are last-write-wins.
pub struct SessionStore {
    storage: Arc<dyn SessionStorage>,
    cache: RwLock<Session>,
}

impl SessionStore {
    /// Starts with the null session; call [`SessionStore::load`] on startup
    pub fn new(storage: Arc<dyn SessionStorage>) -> Self {
        Self {
            storage,
            cache: RwLock::new(Session::empty()),
        }
    }

    /// Persist, then overwrite the cache. Returns once the record is
    /// durable; on failure neither copy changes.
    pub fn save(&self, token: &str, user: Option<JsonValue>) -> Result<Session> {
        let session = Session::new(token, user);
        let raw = serde_json::to_string(&session)?;
        self.storage.set_item(SESSION_KEY, &raw)?;
        self.set_cache(session.clone())?;
        Ok(session)
    }

    /// Read the persisted record into memory.
    ///
    /// Never fails: absent, unreadable or malformed records load as the
    /// null session.
    pub fn load(&self) -> Session {
        let session = match self.storage.get_item(SESSION_KEY) {
            Ok(Some(raw)) => Session::from_persisted(&raw),
            Ok(None) | Err(_) => Session::empty(),
        };
        let _ = self.set_cache(session.clone());
        session
    }

    /// In-memory copy, no I/O
    pub fn get_cached(&self) -> Session {
        self.cache
            .read()
            .map(|s| s.clone())
            .unwrap_or_default()
    }

    /// Current token, if any
    pub fn token(&self) -> Option<String> {
        self.get_cached().token().map(str::to_string)
    }

    /// Reset memory, then remove the persisted record. Idempotent.
    pub fn clear(&self) -> Result<()> {
        self.set_cache(Session::empty())?;
        self.storage.remove_item(SESSION_KEY)
    }

    fn set_cache(&self, session: Session) -> Result<()> {
        let mut cache = self
            .cache
            .write()
            .map_err(|_| Error::storage("Session cache lock poisoned"))?;
        *cache = session;
        Ok(())
    }
}
