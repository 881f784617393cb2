mod attempt;
mod bookmarks;
mod ids;
mod quiz;
mod resource;
mod session_request;
mod topic;
mod tutor;

pub use ids::{
    AttemptId, ParseIdError, QuizSlug, ResourceId, SessionId, SessionRequestId, TutorId,
};
pub use topic::{ParseLabelError, Topic};

pub use attempt::{AttemptError, QuizAttempt, score_percent};
pub use bookmarks::{RsvpSet, SavedResourceSet};
pub use quiz::{Question, Quiz, QuizError};
pub use resource::{GradeBand, Resource, ResourceFilter, ResourceType};
pub use session_request::{
    NewSessionRequest, SessionRequest, SessionRequestDraft, SessionRequestError,
};
pub use tutor::{ScheduledSession, SessionFilter, SessionKind, Tutor};
