use async_trait::async_trait;
use peerpilot_core::Clock;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

use crate::keys::StorageKeys;
use crate::stores::{AttemptStore, RsvpStore, SavedResourceStore, SessionRequestStore};

/// Errors surfaced by storage backends.
///
/// Record stores absorb these: a failed read is an empty collection and a
/// failed write is dropped.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// String key-value storage the record stores persist into.
#[async_trait]
pub trait KeyValueBackend: Send + Sync {
    /// Read the raw value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete `key`. Deleting a missing key succeeds.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;

    /// False when nothing written here outlives the call.
    fn is_available(&self) -> bool {
        true
    }
}

/// Process-local backend. Clones share the same entries.
#[derive(Clone, Default)]
pub struct InMemoryBackend {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl InMemoryBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueBackend for InMemoryBackend {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.remove(key);
        Ok(())
    }
}

/// Backend used when no persistent storage exists: reads are empty and
/// writes vanish.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullBackend;

#[async_trait]
impl KeyValueBackend for NullBackend {
    async fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Ok(None)
    }

    async fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Ok(())
    }

    async fn remove(&self, _key: &str) -> Result<(), StorageError> {
        Ok(())
    }

    fn is_available(&self) -> bool {
        false
    }
}

/// The four progress stores over one backend.
#[derive(Clone)]
pub struct Storage {
    pub attempts: AttemptStore,
    pub rsvps: RsvpStore,
    pub saved_resources: SavedResourceStore,
    pub session_requests: SessionRequestStore,
    backend: Arc<dyn KeyValueBackend>,
}

impl Storage {
    #[must_use]
    pub fn from_backend(backend: Arc<dyn KeyValueBackend>, keys: &StorageKeys, clock: Clock) -> Self {
        Self {
            attempts: AttemptStore::new(Arc::clone(&backend), &keys.attempts),
            rsvps: RsvpStore::new(Arc::clone(&backend), &keys.rsvps),
            saved_resources: SavedResourceStore::new(Arc::clone(&backend), &keys.saved_resources),
            session_requests: SessionRequestStore::new(
                Arc::clone(&backend),
                &keys.session_requests,
                clock,
            ),
            backend,
        }
    }

    #[must_use]
    pub fn in_memory() -> Self {
        Self::from_backend(
            Arc::new(InMemoryBackend::new()),
            &StorageKeys::default(),
            Clock::system(),
        )
    }

    /// Stores that silently do nothing.
    #[must_use]
    pub fn unavailable() -> Self {
        Self::from_backend(Arc::new(NullBackend), &StorageKeys::default(), Clock::system())
    }

    #[must_use]
    pub fn is_available(&self) -> bool {
        self.backend.is_available()
    }

    /// Clear all four collections one after another. No rollback: each clear
    /// is independently idempotent.
    pub async fn clear_all(&self) {
        self.attempts.clear().await;
        self.rsvps.clear().await;
        self.saved_resources.clear().await;
        self.session_requests.clear().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use peerpilot_core::model::{ResourceId, SessionId};

    #[tokio::test]
    async fn in_memory_clones_share_entries() {
        let a = InMemoryBackend::new();
        let b = a.clone();
        a.set("k", "v").await.unwrap();
        assert_eq!(b.get("k").await.unwrap().as_deref(), Some("v"));
        b.remove("k").await.unwrap();
        assert_eq!(a.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn null_backend_drops_writes() {
        let backend = NullBackend;
        backend.set("k", "v").await.unwrap();
        assert_eq!(backend.get("k").await.unwrap(), None);
        assert!(!backend.is_available());
    }

    #[tokio::test]
    async fn clear_all_empties_every_store() {
        let storage = Storage::in_memory();
        storage.rsvps.toggle(&SessionId::new("s1")).await;
        storage.saved_resources.toggle(&ResourceId::new("r1")).await;

        storage.clear_all().await;
        storage.clear_all().await;

        assert!(storage.rsvps.all().await.is_empty());
        assert!(storage.saved_resources.all().await.is_empty());
        assert!(storage.attempts.all().await.is_empty());
        assert!(storage.session_requests.all().await.is_empty());
    }

    #[tokio::test]
    async fn prefixed_storages_do_not_collide() {
        let backend: Arc<dyn KeyValueBackend> = Arc::new(InMemoryBackend::new());
        let first = Storage::from_backend(
            Arc::clone(&backend),
            &StorageKeys::with_prefix("a"),
            Clock::system(),
        );
        let second =
            Storage::from_backend(backend, &StorageKeys::with_prefix("b"), Clock::system());

        first.rsvps.toggle(&SessionId::new("s1")).await;
        assert_eq!(first.rsvps.all().await.len(), 1);
        assert!(second.rsvps.all().await.is_empty());
    }
}
