use std::sync::Arc;

use peerpilot_core::Catalog;
use peerpilot_core::model::{Resource, ResourceFilter, ResourceId};
use storage::SavedResourceStore;
use tracing::debug;

use crate::error::BrowseError;

/// A catalog resource with the student's bookmark flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceListing {
    pub resource: Resource,
    pub saved: bool,
}

/// Resource browsing and bookmarks.
#[derive(Clone)]
pub struct ResourceService {
    catalog: Arc<dyn Catalog>,
    saved: SavedResourceStore,
}

impl ResourceService {
    #[must_use]
    pub fn new(catalog: Arc<dyn Catalog>, saved: SavedResourceStore) -> Self {
        Self { catalog, saved }
    }

    /// Catalog resources passing `filter`, in catalog order.
    pub async fn search(&self, filter: &ResourceFilter) -> Vec<ResourceListing> {
        let saved = self.saved.all().await;
        self.catalog
            .resources()
            .iter()
            .filter(|resource| filter.matches(resource))
            .map(|resource| ResourceListing {
                saved: saved.contains(&resource.id),
                resource: resource.clone(),
            })
            .collect()
    }

    /// Bookmarked resources in catalog order. Saved ids the catalog no longer
    /// knows are skipped.
    pub async fn saved_resources(&self) -> Vec<Resource> {
        let saved = self.saved.all().await;
        self.catalog
            .resources()
            .iter()
            .filter(|resource| saved.contains(&resource.id))
            .cloned()
            .collect()
    }

    /// Flip the bookmark on `id`. Returns `true` if it is now saved.
    ///
    /// # Errors
    ///
    /// Returns `BrowseError::UnknownResource` if the catalog has no such resource.
    pub async fn toggle_saved(&self, id: &ResourceId) -> Result<bool, BrowseError> {
        if self.catalog.resource(id).is_none() {
            return Err(BrowseError::UnknownResource(id.to_string()));
        }
        let saved = self.saved.toggle(id).await.contains(id);
        debug!(resource = %id, saved, "toggled saved resource");
        Ok(saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use peerpilot_core::StaticCatalog;
    use peerpilot_core::model::{ResourceType, Topic};
    use storage::Storage;

    fn service() -> ResourceService {
        let storage = Storage::in_memory();
        ResourceService::new(
            Arc::new(StaticCatalog::builtin().unwrap()),
            storage.saved_resources,
        )
    }

    #[tokio::test]
    async fn search_marks_saved_resources() {
        let service = service();
        assert!(service.toggle_saved(&ResourceId::new("r8")).await.unwrap());

        let filter = ResourceFilter {
            topic: Some(Topic::Geometry),
            ..ResourceFilter::default()
        };
        let listings = service.search(&filter).await;
        let flags: Vec<_> = listings
            .iter()
            .map(|listing| (listing.resource.id.as_str(), listing.saved))
            .collect();
        assert_eq!(flags, [("r3", false), ("r8", true)]);
    }

    #[tokio::test]
    async fn query_and_type_narrow_results() {
        let filter = ResourceFilter {
            kind: Some(ResourceType::Practice),
            query: Some("TRINOMIAL".into()),
            ..ResourceFilter::default()
        };
        let listings = service().search(&filter).await;
        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].resource.id.as_str(), "r2");
    }

    #[tokio::test]
    async fn saved_view_uses_catalog_order() {
        let service = service();
        service.toggle_saved(&ResourceId::new("r6")).await.unwrap();
        service.toggle_saved(&ResourceId::new("r1")).await.unwrap();
        let ids: Vec<_> = service
            .saved_resources()
            .await
            .into_iter()
            .map(|resource| resource.id)
            .collect();
        assert_eq!(ids, [ResourceId::new("r1"), ResourceId::new("r6")]);

        assert!(!service.toggle_saved(&ResourceId::new("r1")).await.unwrap());
        assert_eq!(service.saved_resources().await.len(), 1);
    }

    #[tokio::test]
    async fn unknown_resource_is_rejected() {
        let err = service()
            .toggle_saved(&ResourceId::new("r99"))
            .await
            .unwrap_err();
        assert_eq!(err, BrowseError::UnknownResource("r99".into()));
    }
}
