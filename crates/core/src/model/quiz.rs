use thiserror::Error;

use crate::model::ids::QuizSlug;
use crate::model::topic::Topic;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizError {
    #[error("quiz title cannot be empty")]
    EmptyTitle,

    #[error("quiz has no questions")]
    NoQuestions,

    #[error("question {index} prompt cannot be empty")]
    EmptyPrompt { index: usize },

    #[error("question {index} needs at least two choices")]
    TooFewChoices { index: usize },

    #[error("question {index} correct choice {correct} is out of range for {choices} choices")]
    CorrectIndexOutOfRange {
        index: usize,
        correct: usize,
        choices: usize,
    },
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A single multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    id: String,
    prompt: String,
    choices: Vec<String>,
    correct_index: usize,
    explanation: String,
}

impl Question {
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        prompt: impl Into<String>,
        choices: Vec<String>,
        correct_index: usize,
        explanation: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            prompt: prompt.into(),
            choices,
            correct_index,
            explanation: explanation.into(),
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn choices(&self) -> &[String] {
        &self.choices
    }

    #[must_use]
    pub fn correct_index(&self) -> usize {
        self.correct_index
    }

    #[must_use]
    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    #[must_use]
    pub fn is_correct(&self, choice: usize) -> bool {
        choice == self.correct_index
    }

    fn validate(&self, index: usize) -> Result<(), QuizError> {
        if self.prompt.trim().is_empty() {
            return Err(QuizError::EmptyPrompt { index });
        }
        if self.choices.len() < 2 {
            return Err(QuizError::TooFewChoices { index });
        }
        if self.correct_index >= self.choices.len() {
            return Err(QuizError::CorrectIndexOutOfRange {
                index,
                correct: self.correct_index,
                choices: self.choices.len(),
            });
        }
        Ok(())
    }
}

//
// ─── QUIZ ──────────────────────────────────────────────────────────────────────
//

/// An immutable catalog quiz. Always holds at least one question and every
/// question's correct index points at one of its choices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quiz {
    slug: QuizSlug,
    title: String,
    topic: Topic,
    questions: Vec<Question>,
}

impl Quiz {
    /// Build a validated quiz.
    ///
    /// # Errors
    ///
    /// Returns `QuizError` if the title is blank, there are no questions, or a
    /// question is malformed.
    pub fn new(
        slug: QuizSlug,
        title: impl Into<String>,
        topic: Topic,
        questions: Vec<Question>,
    ) -> Result<Self, QuizError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(QuizError::EmptyTitle);
        }
        if questions.is_empty() {
            return Err(QuizError::NoQuestions);
        }
        for (index, question) in questions.iter().enumerate() {
            question.validate(index)?;
        }
        Ok(Self {
            slug,
            title,
            topic,
            questions,
        })
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
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn question(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}
