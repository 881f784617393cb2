use std::sync::Arc;

use peerpilot_core::model::{ResourceId, SavedResourceSet};

use super::cell::JsonCell;
use crate::repository::KeyValueBackend;

/// Bookmarked resource ids persisted as a JSON array.
#[derive(Clone)]
pub struct SavedResourceStore {
    cell: JsonCell<Vec<ResourceId>>,
}

impl SavedResourceStore {
    #[must_use]
    pub fn new(backend: Arc<dyn KeyValueBackend>, key: &str) -> Self {
        Self {
            cell: JsonCell::new(backend, key),
        }
    }

    pub async fn all(&self) -> SavedResourceSet {
        SavedResourceSet::from_ids(self.cell.load().await)
    }

    pub async fn replace_all(&self, saved: &SavedResourceSet) {
        self.cell.save(&saved.ids().to_vec()).await;
    }

    /// Flip membership of `id` and return the new full set.
    pub async fn toggle(&self, id: &ResourceId) -> SavedResourceSet {
        let mut saved = self.all().await;
        saved.toggle(id);
        self.replace_all(&saved).await;
        saved
    }

    pub async fn clear(&self) {
        self.cell.clear().await;
    }
}
