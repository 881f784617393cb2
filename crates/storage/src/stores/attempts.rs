use std::sync::Arc;

use peerpilot_core::model::QuizAttempt;
use tracing::warn;

use super::cell::JsonCell;
use crate::records::AttemptRecord;
use crate::repository::KeyValueBackend;

/// Number of attempts kept; older ones fall off the end.
pub const MAX_ATTEMPTS: usize = 20;

/// Completed quiz attempts, newest first.
#[derive(Clone)]
pub struct AttemptStore {
    cell: JsonCell<Vec<AttemptRecord>>,
}

impl AttemptStore {
    #[must_use]
    pub fn new(backend: Arc<dyn KeyValueBackend>, key: &str) -> Self {
        Self {
            cell: JsonCell::new(backend, key),
        }
    }

    /// All stored attempts, newest first. Entries that fail to decode or
    /// validate are skipped one by one.
    pub async fn all(&self) -> Vec<QuizAttempt> {
        self.cell
            .load_each()
            .await
            .into_iter()
            .filter_map(|record| {
                let id = record.id;
                record
                    .into_attempt()
                    .map_err(|err| warn!(attempt = %id, error = %err, "skipping invalid attempt"))
                    .ok()
            })
            .collect()
    }

    /// Prepend `attempt` and keep the newest [`MAX_ATTEMPTS`].
    pub async fn add(&self, attempt: QuizAttempt) -> Vec<QuizAttempt> {
        let mut next = Vec::with_capacity(MAX_ATTEMPTS);
        next.push(attempt);
        next.extend(self.all().await);
        next.truncate(MAX_ATTEMPTS);
        self.replace_all(&next).await;
        next
    }

    /// Overwrite the stored collection.
    pub async fn replace_all(&self, attempts: &[QuizAttempt]) {
        let records: Vec<_> = attempts.iter().map(AttemptRecord::from_attempt).collect();
        self.cell.save(&records).await;
    }

    pub async fn clear(&self) {
        self.cell.clear().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{InMemoryBackend, NullBackend};
    use peerpilot_core::model::{AttemptId, QuizSlug, Topic};
    use peerpilot_core::time::fixed_now;

    fn attempt(correct: u32) -> QuizAttempt {
        QuizAttempt::new(
            AttemptId::generate(),
            QuizSlug::new("algebra-basics"),
            "Algebra Basics: Linear Equations",
            Topic::Algebra,
            correct,
            5,
            fixed_now(),
        )
        .unwrap()
    }

    fn store() -> AttemptStore {
        AttemptStore::new(Arc::new(InMemoryBackend::new()), "attempts")
    }

    #[tokio::test]
    async fn keeps_twenty_newest_first() {
        let store = store();
        let mut added = Vec::new();
        for i in 0..25 {
            let a = attempt(i % 6);
            added.push(a.id());
            store.add(a).await;
        }

        let stored: Vec<_> = store.all().await.iter().map(QuizAttempt::id).collect();
        let expected: Vec<_> = added.iter().rev().take(MAX_ATTEMPTS).copied().collect();
        assert_eq!(stored, expected);
    }

    #[tokio::test]
    async fn add_returns_updated_collection() {
        let store = store();
        let first = attempt(3);
        let second = attempt(5);
        store.add(first.clone()).await;
        let all = store.add(second.clone()).await;
        assert_eq!(all, vec![second, first]);
    }

    #[tokio::test]
    async fn clear_is_idempotent() {
        let store = store();
        store.add(attempt(1)).await;
        store.clear().await;
        store.clear().await;
        assert!(store.all().await.is_empty());
    }

    #[tokio::test]
    async fn corrupted_value_reads_empty() {
        let backend = InMemoryBackend::new();
        backend.set("attempts", "definitely not json").await.unwrap();
        let store = AttemptStore::new(Arc::new(backend), "attempts");
        assert!(store.all().await.is_empty());
    }

    #[tokio::test]
    async fn unknown_topic_skips_only_that_attempt() {
        let good = AttemptRecord::from_attempt(&attempt(4));
        let mut bad = serde_json::to_value(AttemptRecord::from_attempt(&attempt(2))).unwrap();
        bad["topic"] = "Calculus".into();
        let raw = serde_json::to_string(&vec![serde_json::to_value(&good).unwrap(), bad]).unwrap();

        let backend = InMemoryBackend::new();
        backend.set("attempts", &raw).await.unwrap();
        let store = AttemptStore::new(Arc::new(backend), "attempts");
        let kept: Vec<_> = store.all().await.iter().map(QuizAttempt::id).collect();
        assert_eq!(kept, vec![good.id]);

        let next = store.add(attempt(5)).await;
        assert_eq!(next.len(), 2);
        assert_eq!(next[1].id(), good.id);
    }

    #[tokio::test]
    async fn unavailable_storage_remembers_nothing() {
        let store = AttemptStore::new(Arc::new(NullBackend), "attempts");
        let returned = store.add(attempt(4)).await;
        assert_eq!(returned.len(), 1);
        assert!(store.all().await.is_empty());
    }
}
