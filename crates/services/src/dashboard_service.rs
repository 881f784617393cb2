use std::sync::Arc;

use peerpilot_core::Catalog;
use peerpilot_core::model::{QuizAttempt, ScheduledSession, SessionRequest};
use storage::Storage;
use tracing::info;

use crate::identity::{AuthState, Gated};
use crate::metrics::{MetricsSnapshot, ProgressCounts};

/// Newest session requests listed on the dashboard.
pub const DASHBOARD_REQUESTS: usize = 8;
/// Newest attempts listed on the dashboard.
pub const DASHBOARD_ATTEMPTS: usize = 6;

/// A personal collection that can be cleared on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearTarget {
    Attempts,
    Rsvps,
    SavedResources,
    SessionRequests,
    All,
}

/// Personal overview for the signed-in student.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardSnapshot {
    pub greeting_name: String,
    pub counts: ProgressCounts,
    pub last_attempt: Option<QuizAttempt>,
    pub recent_attempts: Vec<QuizAttempt>,
    pub recent_requests: Vec<SessionRequest>,
    /// RSVP'd sessions in schedule order.
    pub attending: Vec<ScheduledSession>,
    pub metrics: MetricsSnapshot,
}

/// Read models behind the dashboard and metrics views, plus the reset actions.
#[derive(Clone)]
pub struct DashboardService {
    catalog: Arc<dyn Catalog>,
    storage: Storage,
}

impl DashboardService {
    #[must_use]
    pub fn new(catalog: Arc<dyn Catalog>, storage: Storage) -> Self {
        Self { catalog, storage }
    }

    /// Counts across every personal collection.
    pub async fn counts(&self) -> ProgressCounts {
        ProgressCounts {
            attempts: self.storage.attempts.all().await.len(),
            rsvps: self.storage.rsvps.all().await.len(),
            saved_resources: self.storage.saved_resources.all().await.len(),
            session_requests: self.storage.session_requests.all().await.len(),
        }
    }

    /// Dashboard for `auth`. Storage is not read unless a student is signed in.
    pub async fn dashboard(&self, auth: &AuthState) -> Gated<DashboardSnapshot> {
        let student = match auth.require() {
            Ok(student) => student,
            Err(gated) => return gated,
        };

        let attempts = self.storage.attempts.all().await;
        let requests = self.storage.session_requests.all().await;
        let rsvps = self.storage.rsvps.all().await;
        let counts = ProgressCounts {
            attempts: attempts.len(),
            rsvps: rsvps.len(),
            saved_resources: self.storage.saved_resources.all().await.len(),
            session_requests: requests.len(),
        };
        let attending = self
            .catalog
            .sessions()
            .iter()
            .filter(|session| rsvps.is_attending(&session.id))
            .cloned()
            .collect();

        Gated::Ready(DashboardSnapshot {
            greeting_name: student.display_name().to_owned(),
            metrics: MetricsSnapshot::compute(&attempts, counts),
            counts,
            last_attempt: attempts.first().cloned(),
            recent_attempts: attempts.iter().take(DASHBOARD_ATTEMPTS).cloned().collect(),
            recent_requests: requests.into_iter().take(DASHBOARD_REQUESTS).collect(),
            attending,
        })
    }

    /// Metrics view for `auth`. Storage is not read unless a student is
    /// signed in.
    pub async fn metrics(&self, auth: &AuthState) -> Gated<MetricsSnapshot> {
        if let Err(gated) = auth.require() {
            return gated;
        }
        let attempts = self.storage.attempts.all().await;
        let counts = self.counts().await;
        Gated::Ready(MetricsSnapshot::compute(&attempts, counts))
    }

    /// Clear one collection, or every collection for `ClearTarget::All`.
    pub async fn clear(&self, target: ClearTarget) {
        match target {
            ClearTarget::Attempts => self.storage.attempts.clear().await,
            ClearTarget::Rsvps => self.storage.rsvps.clear().await,
            ClearTarget::SavedResources => self.storage.saved_resources.clear().await,
            ClearTarget::SessionRequests => self.storage.session_requests.clear().await,
            ClearTarget::All => self.storage.clear_all().await,
        }
        info!(?target, "cleared personal data");
    }

    /// Clear every collection.
    pub async fn reset_all(&self) {
        self.clear(ClearTarget::All).await;
    }
}
