#![forbid(unsafe_code)]

pub mod keys;
pub mod records;
pub mod repository;
pub mod sqlite;
pub mod stores;

pub use keys::StorageKeys;
pub use repository::{InMemoryBackend, KeyValueBackend, NullBackend, Storage, StorageError};
pub use stores::{AttemptStore, MAX_ATTEMPTS, RsvpStore, SavedResourceStore, SessionRequestStore};
