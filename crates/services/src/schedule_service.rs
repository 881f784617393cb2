use std::sync::Arc;

use peerpilot_core::Catalog;
use peerpilot_core::model::{ScheduledSession, SessionFilter, SessionId, Topic, Tutor, TutorId};
use storage::RsvpStore;
use tracing::debug;

use crate::error::BrowseError;

/// A scheduled session with the student's RSVP flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionListing {
    pub session: ScheduledSession,
    pub attending: bool,
}

/// Schedule browsing, RSVPs and the tutor directory.
#[derive(Clone)]
pub struct ScheduleService {
    catalog: Arc<dyn Catalog>,
    rsvps: RsvpStore,
}

impl ScheduleService {
    #[must_use]
    pub fn new(catalog: Arc<dyn Catalog>, rsvps: RsvpStore) -> Self {
        Self { catalog, rsvps }
    }

    pub async fn sessions(&self, filter: SessionFilter) -> Vec<SessionListing> {
        let rsvps = self.rsvps.all().await;
        self.catalog
            .sessions()
            .iter()
            .filter(|session| filter.matches(session))
            .map(|session| SessionListing {
                attending: rsvps.is_attending(&session.id),
                session: session.clone(),
            })
            .collect()
    }

    /// Flip the RSVP on `id`. Returns `true` if the student is now attending.
    ///
    /// # Errors
    ///
    /// Returns `BrowseError::UnknownSession` if the schedule has no such session.
    pub async fn toggle_rsvp(&self, id: &SessionId) -> Result<bool, BrowseError> {
        if self.catalog.session(id).is_none() {
            return Err(BrowseError::UnknownSession(id.to_string()));
        }
        let attending = self.rsvps.toggle(id).await.is_attending(id);
        debug!(session = %id, attending, "toggled rsvp");
        Ok(attending)
    }

    /// All tutors, or only those assigned to `topic`.
    #[must_use]
    pub fn tutors(&self, topic: Option<Topic>) -> Vec<Tutor> {
        match topic {
            Some(topic) => self
                .catalog
                .tutors_for_topic(topic)
                .into_iter()
                .cloned()
                .collect(),
            None => self.catalog.tutors().to_vec(),
        }
    }

    /// Look up one tutor in the directory.
    ///
    /// # Errors
    ///
    /// Returns `BrowseError::UnknownTutor` if no tutor has that id.
    pub fn tutor(&self, id: &TutorId) -> Result<Tutor, BrowseError> {
        self.catalog
            .tutor(id)
            .cloned()
            .ok_or_else(|| BrowseError::UnknownTutor(id.to_string()))
    }
}
