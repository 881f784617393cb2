use std::sync::Arc;

use peerpilot_core::model::{NewSessionRequest, SessionRequest, SessionRequestId};
use storage::SessionRequestStore;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::identity::Student;
use crate::notifier::{SessionNotifier, SessionRequestNotice};

/// How the tutor notification went.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationStatus {
    Sent,
    Failed,
}

/// Result of the local half of a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedRequest {
    pub request: SessionRequest,
    /// All stored requests after the save, newest first.
    pub requests: Vec<SessionRequest>,
}

/// Result of a full submission: the local save, which always succeeds, and
/// the notification status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRequestOutcome {
    pub request: SessionRequest,
    pub saved: bool,
    pub notification: NotificationStatus,
}

/// Records session requests locally and notifies the tutor.
///
/// The local save always comes first and never depends on the notification.
#[derive(Clone)]
pub struct SessionRequestService {
    requests: SessionRequestStore,
    notifier: Arc<dyn SessionNotifier>,
}

impl SessionRequestService {
    #[must_use]
    pub fn new(requests: SessionRequestStore, notifier: Arc<dyn SessionNotifier>) -> Self {
        Self { requests, notifier }
    }

    pub async fn list(&self) -> Vec<SessionRequest> {
        self.requests.all().await
    }

    /// Store a validated request. The new record is returned even when
    /// storage is unavailable.
    pub async fn save(&self, details: NewSessionRequest) -> SavedRequest {
        let (request, requests) = self.requests.insert(details).await;
        info!(request = %request.id(), topic = request.details().topic(), "session request saved");
        SavedRequest { request, requests }
    }

    /// Notify the tutor about `request`. Failures are logged and reported as
    /// `Failed`; nothing is retried.
    pub async fn notify(&self, student: &Student, request: &SessionRequest) -> NotificationStatus {
        let notice = SessionRequestNotice::new(student, request);
        deliver(self.notifier.as_ref(), &notice, request.id()).await
    }

    /// Save locally, then notify and wait for the outcome.
    pub async fn submit(&self, student: &Student, details: NewSessionRequest) -> SessionRequestOutcome {
        let SavedRequest { request, .. } = self.save(details).await;
        let notification = self.notify(student, &request).await;
        SessionRequestOutcome {
            request,
            saved: true,
            notification,
        }
    }

    /// Save locally and return at once; the notification runs on a spawned
    /// task whose handle resolves to its status.
    ///
    /// Must be called from within a Tokio runtime.
    pub async fn submit_detached(
        &self,
        student: &Student,
        details: NewSessionRequest,
    ) -> (SavedRequest, JoinHandle<NotificationStatus>) {
        let saved = self.save(details).await;
        let notice = SessionRequestNotice::new(student, &saved.request);
        let notifier = Arc::clone(&self.notifier);
        let id = saved.request.id().clone();
        let handle = tokio::spawn(async move { deliver(notifier.as_ref(), &notice, &id).await });
        (saved, handle)
    }

    /// Remove one request; unknown ids leave the list unchanged.
    pub async fn cancel(&self, id: &SessionRequestId) -> Vec<SessionRequest> {
        self.requests.remove(id).await
    }

    pub async fn clear(&self) {
        self.requests.clear().await;
    }
}

async fn deliver(
    notifier: &dyn SessionNotifier,
    notice: &SessionRequestNotice,
    id: &SessionRequestId,
) -> NotificationStatus {
    match notifier.notify(notice).await {
        Ok(()) => {
            info!(request = %id, "tutor notified");
            NotificationStatus::Sent
        }
        Err(err) => {
            warn!(request = %id, error = %err, "tutor notification failed");
            NotificationStatus::Failed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use peerpilot_core::model::SessionRequestDraft;
    use peerpilot_core::time::fixed_clock;
    use storage::{NullBackend, Storage, StorageKeys};

    use crate::error::NotificationError;

    #[derive(Default)]
    struct RecordingNotifier {
        sent: Mutex<Vec<SessionRequestNotice>>,
    }

    #[async_trait]
    impl SessionNotifier for RecordingNotifier {
        async fn notify(&self, notice: &SessionRequestNotice) -> Result<(), NotificationError> {
            self.sent.lock().unwrap().push(notice.clone());
            Ok(())
        }
    }

    struct StalledNotifier;

    #[async_trait]
    impl SessionNotifier for StalledNotifier {
        async fn notify(&self, _notice: &SessionRequestNotice) -> Result<(), NotificationError> {
            std::future::pending().await
        }
    }

    fn details(topic: &str) -> NewSessionRequest {
        SessionRequestDraft {
            tutor_id: "grace-ball".into(),
            tutor_name: "Grace Ball".into(),
            topic: topic.into(),
            goal: "Review factoring".into(),
            duration: "45 min".into(),
            day: "Monday".into(),
            time: "4:00 PM".into(),
            note: None,
        }
        .validate()
        .unwrap()
    }

    fn student() -> Student {
        Student::new("Maya Chen", Some("maya@example.com".into()))
    }

    #[tokio::test]
    async fn submit_saves_then_notifies() {
        let notifier = Arc::new(RecordingNotifier::default());
        let service = SessionRequestService::new(
            Storage::in_memory().session_requests,
            notifier.clone(),
        );

        let outcome = service.submit(&student(), details("Algebra")).await;
        assert!(outcome.saved);
        assert_eq!(outcome.notification, NotificationStatus::Sent);
        assert_eq!(service.list().await, vec![outcome.request.clone()]);

        let sent = notifier.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].student_name, "Maya Chen");
        assert_eq!(sent[0].topic, "Algebra");
    }

    #[tokio::test]
    async fn resubmission_creates_independent_records() {
        let service = SessionRequestService::new(
            Storage::in_memory().session_requests,
            Arc::new(RecordingNotifier::default()),
        );
        let first = service.submit(&student(), details("Algebra")).await;
        let second = service.submit(&student(), details("Algebra")).await;
        assert_ne!(first.request.id(), second.request.id());
        assert_eq!(service.list().await.len(), 2);
    }

    #[tokio::test]
    async fn unavailable_storage_still_reports_saved() {
        let storage = Storage::from_backend(
            Arc::new(NullBackend),
            &StorageKeys::default(),
            fixed_clock(),
        );
        let service =
            SessionRequestService::new(storage.session_requests, Arc::new(RecordingNotifier::default()));
        let saved = service.save(details("Trig")).await;
        assert_eq!(saved.requests.len(), 1);
        assert_eq!(saved.request.details().topic(), "Trig");
        assert!(service.list().await.is_empty());
    }

    #[tokio::test]
    async fn detached_save_does_not_wait_for_notifier() {
        let service = SessionRequestService::new(
            Storage::in_memory().session_requests,
            Arc::new(StalledNotifier),
        );
        let (saved, handle) = service.submit_detached(&student(), details("Precalc")).await;
        assert_eq!(service.list().await, vec![saved.request]);
        assert!(!handle.is_finished());
        handle.abort();
    }

    #[tokio::test]
    async fn cancel_removes_one() {
        let service = SessionRequestService::new(
            Storage::in_memory().session_requests,
            Arc::new(RecordingNotifier::default()),
        );
        let keep = service.save(details("Algebra")).await.request;
        let dropped = service.save(details("Geometry")).await.request;

        let left = service.cancel(dropped.id()).await;
        assert_eq!(left, vec![keep]);
        assert_eq!(service.cancel(dropped.id()).await.len(), 1);

        service.clear().await;
        assert!(service.list().await.is_empty());
    }
}
