use std::fmt;

use chrono::{DateTime, Utc};
use peerpilot_core::model::{AttemptId, Question, Quiz, QuizAttempt};

use super::progress::QuizProgress;
use crate::error::QuizSessionError;

//
// ─── STATE ─────────────────────────────────────────────────────────────────────
//

/// Where a quiz run currently stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizState {
    /// The student may pick (and re-pick) a choice for `index`.
    Answering { index: usize, selected: Option<usize> },
    /// The answer for `index` is locked and the explanation is shown.
    ShowingExplanation {
        index: usize,
        selected: usize,
        correct: bool,
    },
    /// Terminal: the attempt has been produced.
    Finished,
}

/// What the student sees right after checking an answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerFeedback {
    pub selected: usize,
    pub correct_index: usize,
    pub is_correct: bool,
    pub explanation: String,
}

/// Outcome of moving past an explained question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizStep {
    Next { index: usize },
    Completed(QuizAttempt),
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// In-memory run through one quiz.
///
/// Transitions: `Answering` -> `ShowingExplanation` on check, then either the
/// next `Answering` or `Finished` on advance. Any call that does not fit the
/// current state is rejected with a `QuizSessionError`.
pub struct QuizSession {
    quiz: Quiz,
    state: QuizState,
    correct: u32,
    started_at: DateTime<Utc>,
    attempt: Option<QuizAttempt>,
}

impl QuizSession {
    /// Start a run at the first question.
    ///
    /// # Errors
    ///
    /// Returns `QuizSessionError::Empty` if the quiz has no questions.
    pub fn new(quiz: Quiz, started_at: DateTime<Utc>) -> Result<Self, QuizSessionError> {
        if quiz.is_empty() {
            return Err(QuizSessionError::Empty);
        }
        Ok(Self {
            quiz,
            state: QuizState::Answering {
                index: 0,
                selected: None,
            },
            correct: 0,
            started_at,
            attempt: None,
        })
    }

    #[must_use]
    pub fn quiz(&self) -> &Quiz {
        &self.quiz
    }

    #[must_use]
    pub fn state(&self) -> &QuizState {
        &self.state
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Number of questions answered correctly so far.
    #[must_use]
    pub fn correct_count(&self) -> u32 {
        self.correct
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        matches!(self.state, QuizState::Finished)
    }

    /// The attempt produced when the run finished.
    #[must_use]
    pub fn attempt(&self) -> Option<&QuizAttempt> {
        self.attempt.as_ref()
    }

    fn current_index(&self) -> usize {
        match self.state {
            QuizState::Answering { index, .. } | QuizState::ShowingExplanation { index, .. } => {
                index
            }
            QuizState::Finished => self.quiz.len().saturating_sub(1),
        }
    }

    /// The question on screen, or `None` once finished.
    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        if self.is_finished() {
            return None;
        }
        self.quiz.question(self.current_index())
    }

    #[must_use]
    pub fn progress(&self) -> QuizProgress {
        QuizProgress {
            index: self.current_index(),
            total: self.quiz.len(),
            correct: self.correct,
            is_complete: self.is_finished(),
        }
    }

    /// Pick a choice for the current question. Re-selecting replaces the
    /// previous pick.
    ///
    /// # Errors
    ///
    /// Returns `AnswerLocked` after the answer was checked, `Finished` after the
    /// run ended, and `InvalidChoice` for an out-of-range choice.
    pub fn select_choice(&mut self, choice: usize) -> Result<(), QuizSessionError> {
        let index = match self.state {
            QuizState::Answering { index, .. } => index,
            QuizState::ShowingExplanation { .. } => return Err(QuizSessionError::AnswerLocked),
            QuizState::Finished => return Err(QuizSessionError::Finished),
        };
        let choices = self
            .quiz
            .question(index)
            .map_or(0, |question| question.choices().len());
        if choice >= choices {
            return Err(QuizSessionError::InvalidChoice { choice, choices });
        }
        self.state = QuizState::Answering {
            index,
            selected: Some(choice),
        };
        Ok(())
    }

    /// Lock the current selection and reveal the explanation.
    ///
    /// # Errors
    ///
    /// Returns `NoSelection` when nothing is selected, `AnswerLocked` when the
    /// answer was already checked, and `Finished` after the run ended.
    pub fn check_answer(&mut self) -> Result<AnswerFeedback, QuizSessionError> {
        let (index, selected) = match self.state {
            QuizState::Answering {
                index,
                selected: Some(selected),
            } => (index, selected),
            QuizState::Answering { selected: None, .. } => {
                return Err(QuizSessionError::NoSelection);
            }
            QuizState::ShowingExplanation { .. } => return Err(QuizSessionError::AnswerLocked),
            QuizState::Finished => return Err(QuizSessionError::Finished),
        };
        let question = self.quiz.question(index).ok_or(QuizSessionError::Empty)?;
        let is_correct = question.is_correct(selected);
        if is_correct {
            self.correct += 1;
        }
        let feedback = AnswerFeedback {
            selected,
            correct_index: question.correct_index(),
            is_correct,
            explanation: question.explanation().to_owned(),
        };
        self.state = QuizState::ShowingExplanation {
            index,
            selected,
            correct: is_correct,
        };
        Ok(feedback)
    }

    /// Move past the explained question. On the last question this produces
    /// the attempt and enters `Finished`; it can only happen once per run.
    ///
    /// Crate-private: `QuizLoopService::advance` is the only caller and it
    /// persists the attempt.
    ///
    /// # Errors
    ///
    /// Returns `NotChecked` before the answer is checked and `Finished` after
    /// the run ended.
    pub(crate) fn advance(
        &mut self,
        completed_at: DateTime<Utc>,
    ) -> Result<QuizStep, QuizSessionError> {
        let index = match self.state {
            QuizState::ShowingExplanation { index, .. } => index,
            QuizState::Answering { .. } => return Err(QuizSessionError::NotChecked),
            QuizState::Finished => return Err(QuizSessionError::Finished),
        };

        let next = index + 1;
        if next < self.quiz.len() {
            self.state = QuizState::Answering {
                index: next,
                selected: None,
            };
            return Ok(QuizStep::Next { index: next });
        }

        let total = u32::try_from(self.quiz.len()).unwrap_or(u32::MAX);
        let attempt = QuizAttempt::new(
            AttemptId::generate(),
            self.quiz.slug().clone(),
            self.quiz.title(),
            self.quiz.topic(),
            self.correct,
            total,
            completed_at,
        )?;
        self.state = QuizState::Finished;
        self.attempt = Some(attempt.clone());
        Ok(QuizStep::Completed(attempt))
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("quiz", self.quiz.slug())
            .field("state", &self.state)
            .field("correct", &self.correct)
            .field("started_at", &self.started_at)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use peerpilot_core::model::{QuizSlug, Topic};
    use peerpilot_core::time::fixed_now;

    fn quiz(correct: &[usize]) -> Quiz {
        let questions = correct
            .iter()
            .enumerate()
            .map(|(i, &answer)| {
                Question::new(
                    format!("q{}", i + 1),
                    format!("Question {}", i + 1),
                    vec!["a".into(), "b".into(), "c".into()],
                    answer,
                    format!("Because {answer}"),
                )
            })
            .collect();
        Quiz::new(QuizSlug::new("sample"), "Sample Quiz", Topic::Algebra, questions).unwrap()
    }

    fn answer(session: &mut QuizSession, choice: usize) -> AnswerFeedback {
        session.select_choice(choice).unwrap();
        session.check_answer().unwrap()
    }

    #[test]
    fn starts_answering_first_question() {
        let session = QuizSession::new(quiz(&[0, 1]), fixed_now()).unwrap();
        assert_eq!(
            session.state(),
            &QuizState::Answering {
                index: 0,
                selected: None
            }
        );
        assert_eq!(session.current_question().unwrap().id(), "q1");
        assert_eq!(session.progress().percent(), 50);
    }

    #[test]
    fn reselecting_replaces_choice() {
        let mut session = QuizSession::new(quiz(&[2]), fixed_now()).unwrap();
        session.select_choice(0).unwrap();
        session.select_choice(2).unwrap();
        let feedback = session.check_answer().unwrap();
        assert!(feedback.is_correct);
        assert_eq!(feedback.selected, 2);
        assert_eq!(feedback.explanation, "Because 2");
    }

    #[test]
    fn check_without_selection_is_rejected() {
        let mut session = QuizSession::new(quiz(&[0]), fixed_now()).unwrap();
        assert_eq!(session.check_answer(), Err(QuizSessionError::NoSelection));
    }

    #[test]
    fn out_of_range_choice_is_rejected() {
        let mut session = QuizSession::new(quiz(&[0]), fixed_now()).unwrap();
        assert_eq!(
            session.select_choice(3),
            Err(QuizSessionError::InvalidChoice {
                choice: 3,
                choices: 3
            })
        );
    }

    #[test]
    fn selection_is_locked_after_check() {
        let mut session = QuizSession::new(quiz(&[0, 1]), fixed_now()).unwrap();
        answer(&mut session, 1);
        assert_eq!(session.select_choice(0), Err(QuizSessionError::AnswerLocked));
        assert_eq!(session.check_answer(), Err(QuizSessionError::AnswerLocked));
        assert_eq!(session.correct_count(), 0);
    }

    #[test]
    fn advance_requires_checked_answer() {
        let mut session = QuizSession::new(quiz(&[0, 1]), fixed_now()).unwrap();
        session.select_choice(0).unwrap();
        assert_eq!(
            session.advance(fixed_now()),
            Err(QuizSessionError::NotChecked)
        );
    }

    #[test]
    fn advance_clears_selection_for_next_question() {
        let mut session = QuizSession::new(quiz(&[0, 1]), fixed_now()).unwrap();
        answer(&mut session, 0);
        assert_eq!(
            session.advance(fixed_now()),
            Ok(QuizStep::Next { index: 1 })
        );
        assert_eq!(
            session.state(),
            &QuizState::Answering {
                index: 1,
                selected: None
            }
        );
    }

    #[test]
    fn finishing_produces_attempt_once() {
        let mut session = QuizSession::new(quiz(&[0, 1, 2]), fixed_now()).unwrap();
        answer(&mut session, 0);
        session.advance(fixed_now()).unwrap();
        answer(&mut session, 0);
        session.advance(fixed_now()).unwrap();
        answer(&mut session, 2);

        let QuizStep::Completed(attempt) = session.advance(fixed_now()).unwrap() else {
            panic!("expected completion");
        };
        assert_eq!(attempt.correct(), 2);
        assert_eq!(attempt.total(), 3);
        assert_eq!(attempt.score_percent(), 67);
        assert_eq!(attempt.title(), "Sample Quiz");
        assert_eq!(attempt.completed_at(), fixed_now());

        assert!(session.is_finished());
        assert!(session.current_question().is_none());
        assert_eq!(session.attempt(), Some(&attempt));
        assert_eq!(session.advance(fixed_now()), Err(QuizSessionError::Finished));
        assert_eq!(session.select_choice(0), Err(QuizSessionError::Finished));
        assert_eq!(session.progress().percent(), 100);
    }
}
