use std::sync::Arc;

use peerpilot_core::{Catalog, StaticCatalog};
use storage::Storage;

use crate::Clock;
use crate::dashboard_service::DashboardService;
use crate::error::AppServicesError;
use crate::notifier::{EmailNotifier, SessionNotifier};
use crate::quizzes::QuizLoopService;
use crate::resource_service::ResourceService;
use crate::schedule_service::ScheduleService;
use crate::session_request_service::SessionRequestService;

/// Assembles app-facing services over one storage and one catalog.
#[derive(Clone)]
pub struct AppServices {
    catalog: Arc<dyn Catalog>,
    storage_available: bool,
    quiz_loop: Arc<QuizLoopService>,
    dashboard: Arc<DashboardService>,
    resources: Arc<ResourceService>,
    schedule: Arc<ScheduleService>,
    session_requests: Arc<SessionRequestService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage, the built-in catalog and the
    /// environment-configured mail notifier.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization or catalog
    /// validation fails.
    pub async fn new_sqlite(db_url: &str, clock: Clock) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url, clock).await?;
        Self::with_builtin_catalog(storage, clock)
    }

    /// Build services over `storage` with the built-in catalog and the
    /// environment-configured mail notifier.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError::Catalog` if the built-in catalog is invalid.
    pub fn with_builtin_catalog(storage: Storage, clock: Clock) -> Result<Self, AppServicesError> {
        let catalog: Arc<dyn Catalog> = Arc::new(StaticCatalog::builtin()?);
        let notifier: Arc<dyn SessionNotifier> = Arc::new(EmailNotifier::from_env());
        Ok(Self::new(storage, catalog, notifier, clock))
    }

    #[must_use]
    pub fn new(
        storage: Storage,
        catalog: Arc<dyn Catalog>,
        notifier: Arc<dyn SessionNotifier>,
        clock: Clock,
    ) -> Self {
        let quiz_loop = Arc::new(QuizLoopService::new(
            clock,
            Arc::clone(&catalog),
            storage.attempts.clone(),
        ));
        let resources = Arc::new(ResourceService::new(
            Arc::clone(&catalog),
            storage.saved_resources.clone(),
        ));
        let schedule = Arc::new(ScheduleService::new(
            Arc::clone(&catalog),
            storage.rsvps.clone(),
        ));
        let session_requests = Arc::new(SessionRequestService::new(
            storage.session_requests.clone(),
            notifier,
        ));
        let storage_available = storage.is_available();
        let dashboard = Arc::new(DashboardService::new(Arc::clone(&catalog), storage));

        Self {
            catalog,
            storage_available,
            quiz_loop,
            dashboard,
            resources,
            schedule,
            session_requests,
        }
    }

    #[must_use]
    pub fn catalog(&self) -> Arc<dyn Catalog> {
        Arc::clone(&self.catalog)
    }

    /// False when running without persistent storage.
    #[must_use]
    pub fn storage_available(&self) -> bool {
        self.storage_available
    }

    #[must_use]
    pub fn quiz_loop(&self) -> Arc<QuizLoopService> {
        Arc::clone(&self.quiz_loop)
    }

    #[must_use]
    pub fn dashboard(&self) -> Arc<DashboardService> {
        Arc::clone(&self.dashboard)
    }

    #[must_use]
    pub fn resources(&self) -> Arc<ResourceService> {
        Arc::clone(&self.resources)
    }

    #[must_use]
    pub fn schedule(&self) -> Arc<ScheduleService> {
        Arc::clone(&self.schedule)
    }

    #[must_use]
    pub fn session_requests(&self) -> Arc<SessionRequestService> {
        Arc::clone(&self.session_requests)
    }
}
