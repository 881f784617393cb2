#![forbid(unsafe_code)]

pub mod app_services;
pub mod dashboard_service;
pub mod error;
pub mod identity;
pub mod metrics;
pub mod notifier;
pub mod quizzes;
pub mod resource_service;
pub mod schedule_service;
pub mod session_request_service;

pub use peerpilot_core::Clock;

pub use app_services::AppServices;
pub use dashboard_service::{ClearTarget, DashboardService, DashboardSnapshot};
pub use error::{AppServicesError, BrowseError, NotificationError, QuizSessionError};
pub use identity::{AuthState, Gated, Student};
pub use metrics::{ChartBar, MetricsSnapshot, ProgressCounts};
pub use notifier::{EmailNotifier, NotifierConfig, SessionNotifier, SessionRequestNotice};
pub use quizzes::{AnswerFeedback, QuizLoopService, QuizProgress, QuizSession, QuizState, QuizStep};
pub use resource_service::{ResourceListing, ResourceService};
pub use schedule_service::{ScheduleService, SessionListing};
pub use session_request_service::{
    NotificationStatus, SavedRequest, SessionRequestOutcome, SessionRequestService,
};
