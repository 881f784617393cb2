use std::marker::PhantomData;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::repository::KeyValueBackend;

/// One JSON document under one key. Every read and write is whole-value.
///
/// Failures never escape: unreadable or malformed content loads as
/// `T::default()` and failed writes are logged and dropped.
pub(crate) struct JsonCell<T> {
    backend: Arc<dyn KeyValueBackend>,
    key: String,
    _value: PhantomData<fn() -> T>,
}

impl<T> Clone for JsonCell<T> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            key: self.key.clone(),
            _value: PhantomData,
        }
    }
}

impl<T> JsonCell<T>
where
    T: Serialize + DeserializeOwned + Default,
{
    pub(crate) fn new(backend: Arc<dyn KeyValueBackend>, key: &str) -> Self {
        Self {
            backend,
            key: key.to_string(),
            _value: PhantomData,
        }
    }

    pub(crate) async fn load(&self) -> T {
        let Some(raw) = self.read_raw().await else {
            return T::default();
        };
        serde_json::from_str(&raw).unwrap_or_else(|err| {
            warn!(key = %self.key, error = %err, "stored value is malformed; using empty value");
            T::default()
        })
    }

    async fn read_raw(&self) -> Option<String> {
        match self.backend.get(&self.key).await {
            Ok(raw) => raw,
            Err(err) => {
                warn!(key = %self.key, error = %err, "storage read failed; using empty value");
                None
            }
        }
    }

    pub(crate) async fn save(&self, value: &T) {
        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(err) => {
                warn!(key = %self.key, error = %err, "failed to encode value; write dropped");
                return;
            }
        };
        match self.backend.set(&self.key, &raw).await {
            Ok(()) => debug!(key = %self.key, bytes = raw.len(), "stored value"),
            Err(err) => warn!(key = %self.key, error = %err, "storage write failed"),
        }
    }

    pub(crate) async fn clear(&self) {
        if let Err(err) = self.backend.remove(&self.key).await {
            warn!(key = %self.key, error = %err, "storage clear failed");
        }
    }
}

impl<R> JsonCell<Vec<R>>
where
    R: Serialize + DeserializeOwned,
{
    /// Load a JSON array one element at a time. Elements that do not decode
    /// as `R` are skipped, so one bad entry does not hide the rest.
    pub(crate) async fn load_each(&self) -> Vec<R> {
        let Some(raw) = self.read_raw().await else {
            return Vec::new();
        };
        let values: Vec<serde_json::Value> = match serde_json::from_str(&raw) {
            Ok(values) => values,
            Err(err) => {
                warn!(key = %self.key, error = %err, "stored value is malformed; using empty value");
                return Vec::new();
            }
        };
        values
            .into_iter()
            .filter_map(|value| {
                serde_json::from_value(value)
                    .map_err(|err| warn!(key = %self.key, error = %err, "skipping unreadable entry"))
                    .ok()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{InMemoryBackend, StorageError};
    use async_trait::async_trait;

    struct BrokenBackend;

    #[async_trait]
    impl KeyValueBackend for BrokenBackend {
        async fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Connection("disk gone".into()))
        }

        async fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Connection("disk gone".into()))
        }

        async fn remove(&self, _key: &str) -> Result<(), StorageError> {
            Err(StorageError::Connection("disk gone".into()))
        }
    }

    #[tokio::test]
    async fn malformed_json_loads_as_default() {
        let backend = InMemoryBackend::new();
        backend.set("k", "{not json").await.unwrap();
        let cell: JsonCell<Vec<String>> = JsonCell::new(Arc::new(backend), "k");
        assert!(cell.load().await.is_empty());
    }

    #[tokio::test]
    async fn load_each_skips_bad_elements() {
        let backend = InMemoryBackend::new();
        backend.set("k", r#"[1, "two", 3]"#).await.unwrap();
        let cell: JsonCell<Vec<u32>> = JsonCell::new(Arc::new(backend), "k");
        assert_eq!(cell.load_each().await, vec![1, 3]);
    }

    #[tokio::test]
    async fn load_each_of_non_array_is_empty() {
        let backend = InMemoryBackend::new();
        backend.set("k", r#"{"a": 1}"#).await.unwrap();
        let cell: JsonCell<Vec<u32>> = JsonCell::new(Arc::new(backend), "k");
        assert!(cell.load_each().await.is_empty());
    }

    #[tokio::test]
    async fn backend_failures_are_absorbed() {
        let cell: JsonCell<Vec<String>> = JsonCell::new(Arc::new(BrokenBackend), "k");
        cell.save(&vec!["a".to_string()]).await;
        cell.clear().await;
        assert!(cell.load().await.is_empty());
    }
}
