mod progress;
mod service;
mod workflow;

// Public API of the quiz subsystem.
pub use crate::error::QuizSessionError;
pub use progress::QuizProgress;
pub use service::{AnswerFeedback, QuizSession, QuizState, QuizStep};
pub use workflow::QuizLoopService;
