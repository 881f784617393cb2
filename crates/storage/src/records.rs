//! Persisted JSON shapes.
//!
//! These mirror the domain types so stores can serialize without leaking
//! storage concerns into the core crate. Field names match the layout written
//! by the browser build of the app, so existing data stays readable.

use chrono::{DateTime, Utc};
use peerpilot_core::model::{
    AttemptError, AttemptId, QuizAttempt, QuizSlug, SessionRequest, SessionRequestDraft,
    SessionRequestError, SessionRequestId, Topic,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptRecord {
    pub id: AttemptId,
    pub slug: QuizSlug,
    pub title: String,
    pub topic: Topic,
    pub score_percent: u8,
    pub correct: u32,
    pub total: u32,
    #[serde(rename = "dateISO")]
    pub date: DateTime<Utc>,
}

impl AttemptRecord {
    #[must_use]
    pub fn from_attempt(attempt: &QuizAttempt) -> Self {
        Self {
            id: attempt.id(),
            slug: attempt.slug().clone(),
            title: attempt.title().to_owned(),
            topic: attempt.topic(),
            score_percent: attempt.score_percent(),
            correct: attempt.correct(),
            total: attempt.total(),
            date: attempt.completed_at(),
        }
    }

    /// Convert the record back into a domain `QuizAttempt`.
    ///
    /// # Errors
    ///
    /// Returns `AttemptError` if the counts or stored score are inconsistent.
    pub fn into_attempt(self) -> Result<QuizAttempt, AttemptError> {
        QuizAttempt::from_persisted(
            self.id,
            self.slug,
            self.title,
            self.topic,
            self.correct,
            self.total,
            self.score_percent,
            self.date,
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRequestRecord {
    pub id: SessionRequestId,
    #[serde(rename = "createdAtISO")]
    pub created_at: DateTime<Utc>,
    pub tutor_id: String,
    pub tutor_name: String,
    pub topic: String,
    pub goal: String,
    pub duration: String,
    pub day: String,
    pub time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl SessionRequestRecord {
    #[must_use]
    pub fn from_request(request: &SessionRequest) -> Self {
        let details = request.details();
        Self {
            id: request.id().clone(),
            created_at: request.created_at(),
            tutor_id: details.tutor_id().to_string(),
            tutor_name: details.tutor_name().to_owned(),
            topic: details.topic().to_owned(),
            goal: details.goal().to_owned(),
            duration: details.duration().to_owned(),
            day: details.day().to_owned(),
            time: details.time().to_owned(),
            note: details.note().map(str::to_owned),
        }
    }

    /// Convert the record back into a domain `SessionRequest`.
    ///
    /// # Errors
    ///
    /// Returns `SessionRequestError` if a required field is blank.
    pub fn into_request(self) -> Result<SessionRequest, SessionRequestError> {
        SessionRequest::from_persisted(
            self.id,
            self.created_at,
            SessionRequestDraft {
                tutor_id: self.tutor_id,
                tutor_name: self.tutor_name,
                topic: self.topic,
                goal: self.goal,
                duration: self.duration,
                day: self.day,
                time: self.time,
                note: self.note,
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_browser_attempt_layout() {
        let raw = r#"{
            "id": "6f1c1a3e-2f43-4a3b-9a47-3c1d2e5f7a90",
            "slug": "algebra-basics",
            "title": "Algebra Basics: Linear Equations",
            "topic": "Algebra",
            "scorePercent": 80,
            "correct": 4,
            "total": 5,
            "dateISO": "2024-03-01T17:30:00.000Z"
        }"#;
        let record: AttemptRecord = serde_json::from_str(raw).unwrap();
        let attempt = record.into_attempt().unwrap();
        assert_eq!(attempt.score_percent(), 80);
        assert_eq!(attempt.topic(), Topic::Algebra);
    }

    #[test]
    fn request_note_is_omitted_when_absent() {
        let raw = r#"{
            "id": "sr_abc12345",
            "createdAtISO": "2024-03-01T17:30:00Z",
            "tutorId": "rey-garg",
            "tutorName": "Rey Garg",
            "topic": "Algebra",
            "goal": "Homework",
            "duration": "30 min",
            "day": "Monday",
            "time": "4:00 PM"
        }"#;
        let record: SessionRequestRecord = serde_json::from_str(raw).unwrap();
        let request = record.clone().into_request().unwrap();
        assert_eq!(request.details().note(), None);

        let json = serde_json::to_string(&SessionRequestRecord::from_request(&request)).unwrap();
        assert!(!json.contains("note"));
        assert!(json.contains("\"createdAtISO\""));
    }
}
