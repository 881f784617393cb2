use std::collections::BTreeMap;
use std::sync::Arc;

use peerpilot_core::model::{RsvpSet, SessionId};

use super::cell::JsonCell;
use crate::repository::KeyValueBackend;

/// RSVP flags persisted as `{"<session id>": true}`.
#[derive(Clone)]
pub struct RsvpStore {
    cell: JsonCell<BTreeMap<String, bool>>,
}

impl RsvpStore {
    #[must_use]
    pub fn new(backend: Arc<dyn KeyValueBackend>, key: &str) -> Self {
        Self {
            cell: JsonCell::new(backend, key),
        }
    }

    pub async fn all(&self) -> RsvpSet {
        let flags = self.cell.load().await;
        RsvpSet::from_flags(
            flags
                .into_iter()
                .map(|(id, attending)| (SessionId::new(id), attending)),
        )
    }

    pub async fn replace_all(&self, rsvps: &RsvpSet) {
        let flags: BTreeMap<String, bool> = rsvps
            .iter()
            .map(|id| (id.as_str().to_string(), true))
            .collect();
        self.cell.save(&flags).await;
    }

    /// Flip the RSVP for `session` and return the new full set.
    pub async fn toggle(&self, session: &SessionId) -> RsvpSet {
        let mut rsvps = self.all().await;
        rsvps.toggle(session);
        self.replace_all(&rsvps).await;
        rsvps
    }

    pub async fn clear(&self) {
        self.cell.clear().await;
    }
}
