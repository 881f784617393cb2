use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::ids::{SessionRequestId, TutorId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionRequestError {
    #[error("{field} is required")]
    MissingField { field: &'static str },
}

/// Form input for a tutoring session request, before validation.
#[derive(Clone, Debug, Default)]
pub struct SessionRequestDraft {
    pub tutor_id: String,
    pub tutor_name: String,
    pub topic: String,
    pub goal: String,
    pub duration: String,
    pub day: String,
    pub time: String,
    pub note: Option<String>,
}

/// Validated request fields, ready to hand to the request store.
///
/// The store assigns the id and creation time; callers never supply them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewSessionRequest {
    tutor_id: TutorId,
    tutor_name: String,
    topic: String,
    goal: String,
    duration: String,
    day: String,
    time: String,
    note: Option<String>,
}

impl SessionRequestDraft {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Trim every field and check the required ones are present.
    ///
    /// # Errors
    ///
    /// Returns `SessionRequestError::MissingField` naming the first blank
    /// required field.
    pub fn validate(self) -> Result<NewSessionRequest, SessionRequestError> {
        Ok(NewSessionRequest {
            tutor_id: TutorId::new(required("tutor", self.tutor_id)?),
            tutor_name: required("tutor name", self.tutor_name)?,
            topic: required("topic", self.topic)?,
            goal: required("goal", self.goal)?,
            duration: required("duration", self.duration)?,
            day: required("day", self.day)?,
            time: required("time", self.time)?,
            note: normalize_optional(self.note),
        })
    }
}

impl NewSessionRequest {
    #[must_use]
    pub fn tutor_id(&self) -> &TutorId {
        &self.tutor_id
    }

    #[must_use]
    pub fn tutor_name(&self) -> &str {
        &self.tutor_name
    }

    #[must_use]
    pub fn topic(&self) -> &str {
        &self.topic
    }

    #[must_use]
    pub fn goal(&self) -> &str {
        &self.goal
    }

    #[must_use]
    pub fn duration(&self) -> &str {
        &self.duration
    }

    #[must_use]
    pub fn day(&self) -> &str {
        &self.day
    }

    #[must_use]
    pub fn time(&self) -> &str {
        &self.time
    }

    #[must_use]
    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }
}

/// A stored session request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionRequest {
    id: SessionRequestId,
    created_at: DateTime<Utc>,
    details: NewSessionRequest,
}

impl SessionRequest {
    #[must_use]
    pub fn new(id: SessionRequestId, created_at: DateTime<Utc>, details: NewSessionRequest) -> Self {
        Self {
            id,
            created_at,
            details,
        }
    }

    /// Rehydrate a request from storage.
    ///
    /// # Errors
    ///
    /// Returns `SessionRequestError` if a required field is blank.
    pub fn from_persisted(
        id: SessionRequestId,
        created_at: DateTime<Utc>,
        draft: SessionRequestDraft,
    ) -> Result<Self, SessionRequestError> {
        Ok(Self::new(id, created_at, draft.validate()?))
    }

    #[must_use]
    pub fn id(&self) -> &SessionRequestId {
        &self.id
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[must_use]
    pub fn details(&self) -> &NewSessionRequest {
        &self.details
    }
}

fn required(field: &'static str, value: String) -> Result<String, SessionRequestError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(SessionRequestError::MissingField { field });
    }
    Ok(trimmed.to_string())
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|val| val.trim().to_string())
        .filter(|val| !val.is_empty())
}
