use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::ids::{AttemptId, QuizSlug};
use crate::model::topic::Topic;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AttemptError {
    #[error("attempt must cover at least one question")]
    NoQuestions,

    #[error("correct count ({correct}) exceeds total questions ({total})")]
    CorrectExceedsTotal { correct: u32, total: u32 },

    #[error("stored score {stored}% does not match {correct}/{total}")]
    ScoreMismatch { stored: u8, correct: u32, total: u32 },
}

/// Rounds `correct / total * 100` half-up to a whole percent.
///
/// Callers guarantee `total > 0` and `correct <= total`.
#[must_use]
pub fn score_percent(correct: u32, total: u32) -> u8 {
    let correct = u64::from(correct);
    let total = u64::from(total.max(1));
    let rounded = (correct * 200 + total) / (total * 2);
    u8::try_from(rounded.min(100)).unwrap_or(100)
}

/// One completed quiz run. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizAttempt {
    id: AttemptId,
    slug: QuizSlug,
    title: String,
    topic: Topic,
    correct: u32,
    total: u32,
    score_percent: u8,
    completed_at: DateTime<Utc>,
}

impl QuizAttempt {
    /// Build a new attempt, deriving the score from `correct` and `total`.
    ///
    /// # Errors
    ///
    /// Returns `AttemptError` if `total` is zero or `correct > total`.
    pub fn new(
        id: AttemptId,
        slug: QuizSlug,
        title: impl Into<String>,
        topic: Topic,
        correct: u32,
        total: u32,
        completed_at: DateTime<Utc>,
    ) -> Result<Self, AttemptError> {
        check_counts(correct, total)?;
        Ok(Self {
            id,
            slug,
            title: title.into(),
            topic,
            correct,
            total,
            score_percent: score_percent(correct, total),
            completed_at,
        })
    }

    /// Rehydrate an attempt from storage, checking the stored score.
    ///
    /// # Errors
    ///
    /// Returns `AttemptError` if counts are inconsistent or the stored score
    /// does not match them.
    #[allow(clippy::too_many_arguments)]
    pub fn from_persisted(
        id: AttemptId,
        slug: QuizSlug,
        title: String,
        topic: Topic,
        correct: u32,
        total: u32,
        stored_score: u8,
        completed_at: DateTime<Utc>,
    ) -> Result<Self, AttemptError> {
        let attempt = Self::new(id, slug, title, topic, correct, total, completed_at)?;
        if attempt.score_percent != stored_score {
            return Err(AttemptError::ScoreMismatch {
                stored: stored_score,
                correct,
                total,
            });
        }
        Ok(attempt)
    }

    #[must_use]
    pub fn id(&self) -> AttemptId {
        self.id
    }

    #[must_use]
    pub fn slug(&self) -> &QuizSlug {
        &self.slug
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn topic(&self) -> Topic {
        self.topic
    }

    #[must_use]
    pub fn correct(&self) -> u32 {
        self.correct
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.total
    }

    #[must_use]
    pub fn score_percent(&self) -> u8 {
        self.score_percent
    }

    #[must_use]
    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }
}

fn check_counts(correct: u32, total: u32) -> Result<(), AttemptError> {
    if total == 0 {
        return Err(AttemptError::NoQuestions);
    }
    if correct > total {
        return Err(AttemptError::CorrectExceedsTotal { correct, total });
    }
    Ok(())
}
