use std::sync::Arc;

use peerpilot_core::Catalog;
use peerpilot_core::model::{Quiz, QuizSlug};
use storage::AttemptStore;
use tracing::{debug, info};

use super::service::{QuizSession, QuizStep};
use crate::Clock;
use crate::error::QuizSessionError;

/// Orchestrates quiz start and the persisted final advance.
#[derive(Clone)]
pub struct QuizLoopService {
    clock: Clock,
    catalog: Arc<dyn Catalog>,
    attempts: AttemptStore,
}

impl QuizLoopService {
    #[must_use]
    pub fn new(clock: Clock, catalog: Arc<dyn Catalog>, attempts: AttemptStore) -> Self {
        Self {
            clock,
            catalog,
            attempts,
        }
    }

    /// Catalog quizzes in display order.
    #[must_use]
    pub fn quizzes(&self) -> &[Quiz] {
        self.catalog.quizzes()
    }

    /// Start a new run of the quiz identified by `slug`.
    ///
    /// # Errors
    ///
    /// Returns `QuizSessionError::NotFound` for an unknown slug.
    pub fn start(&self, slug: &QuizSlug) -> Result<QuizSession, QuizSessionError> {
        let quiz = self
            .catalog
            .quiz(slug)
            .ok_or_else(|| QuizSessionError::NotFound(slug.to_string()))?;
        debug!(quiz = %slug, questions = quiz.len(), "starting quiz");
        QuizSession::new(quiz.clone(), self.clock.now())
    }

    /// Advance past the explained question. When the run completes, the
    /// attempt is recorded in the attempt history.
    ///
    /// A finished session rejects further advances, so each run records at
    /// most one attempt.
    ///
    /// # Errors
    ///
    /// Propagates state errors from `QuizSession`.
    pub async fn advance(&self, session: &mut QuizSession) -> Result<QuizStep, QuizSessionError> {
        let step = session.advance(self.clock.now())?;
        if let QuizStep::Completed(attempt) = &step {
            self.attempts.add(attempt.clone()).await;
            info!(
                quiz = %attempt.slug(),
                correct = attempt.correct(),
                total = attempt.total(),
                score = attempt.score_percent(),
                "quiz attempt recorded"
            );
        }
        Ok(step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use peerpilot_core::StaticCatalog;
    use peerpilot_core::time::fixed_clock;
    use storage::Storage;

    fn service(storage: &Storage) -> QuizLoopService {
        let catalog: Arc<dyn Catalog> = Arc::new(StaticCatalog::builtin().unwrap());
        QuizLoopService::new(fixed_clock(), catalog, storage.attempts.clone())
    }

    #[test]
    fn unknown_slug_is_not_found() {
        let storage = Storage::in_memory();
        let err = service(&storage)
            .start(&QuizSlug::new("calculus-limits"))
            .unwrap_err();
        assert_eq!(err, QuizSessionError::NotFound("calculus-limits".into()));
    }

    #[tokio::test]
    async fn intermediate_advance_does_not_persist() {
        let storage = Storage::in_memory();
        let service = service(&storage);
        let mut session = service.start(&QuizSlug::new("algebra-basics")).unwrap();
        session.select_choice(0).unwrap();
        session.check_answer().unwrap();

        let step = service.advance(&mut session).await.unwrap();
        assert_eq!(step, QuizStep::Next { index: 1 });
        assert!(storage.attempts.all().await.is_empty());
    }
}
