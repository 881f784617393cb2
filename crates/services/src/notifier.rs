use std::env;
use std::fmt::Write as _;
use std::time::Duration;

use async_trait::async_trait;
use peerpilot_core::model::SessionRequest;
use reqwest::Client;
use serde::Serialize;

use crate::error::NotificationError;
use crate::identity::Student;

const DEFAULT_BASE_URL: &str = "https://api.resend.com";
const DEFAULT_FROM: &str = "PeerPilot <onboarding@resend.dev>";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

//
// ─── NOTICE ────────────────────────────────────────────────────────────────────
//

/// Everything the tutor is told about a new session request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRequestNotice {
    pub student_name: String,
    pub student_email: Option<String>,
    pub tutor_name: String,
    pub topic: String,
    pub goal: String,
    pub duration: String,
    pub day: String,
    pub time: String,
    pub note: Option<String>,
}

impl SessionRequestNotice {
    #[must_use]
    pub fn new(student: &Student, request: &SessionRequest) -> Self {
        let details = request.details();
        Self {
            student_name: student.name().to_owned(),
            student_email: student.email().map(str::to_owned),
            tutor_name: details.tutor_name().to_owned(),
            topic: details.topic().to_owned(),
            goal: details.goal().to_owned(),
            duration: details.duration().to_owned(),
            day: details.day().to_owned(),
            time: details.time().to_owned(),
            note: details.note().map(str::to_owned),
        }
    }

    #[must_use]
    pub fn subject(&self) -> String {
        format!("New Session Request: {}", self.topic)
    }

    /// HTML body with every user-supplied value escaped.
    #[must_use]
    pub fn html_body(&self) -> String {
        let field = |label: &str, value: &str| {
            format!(
                "<p><strong>{label}:</strong> {}</p>\n",
                ammonia::clean_text(value)
            )
        };

        let mut html = String::from("<h2>New PeerPilot Session Request</h2>\n");
        html.push_str(&field("Student", &self.student_name));
        html.push_str(&field(
            "Email",
            self.student_email.as_deref().unwrap_or_default(),
        ));
        html.push_str("<hr />\n");
        html.push_str(&field("Tutor", &self.tutor_name));
        html.push_str(&field("Topic", &self.topic));
        html.push_str(&field("Goal", &self.goal));
        html.push_str(&field("Duration", &self.duration));
        html.push_str(&field(
            "Requested Time",
            &format!("{} @ {}", self.day, self.time),
        ));
        if let Some(note) = &self.note {
            let _ = writeln!(
                html,
                "<p><strong>Student Note:</strong><br/>{}</p>",
                ammonia::clean_text(note)
            );
        }
        html.push_str("<hr />\n<p>Reply to this email to send the Zoom link.</p>\n");
        html
    }
}

//
// ─── NOTIFIER ──────────────────────────────────────────────────────────────────
//

/// Outbound notification collaborator. Only success or failure matters to
/// callers.
#[async_trait]
pub trait SessionNotifier: Send + Sync {
    async fn notify(&self, notice: &SessionRequestNotice) -> Result<(), NotificationError>;
}

#[derive(Clone, Debug)]
pub struct NotifierConfig {
    pub base_url: String,
    pub api_key: String,
    pub from: String,
    pub tutor_email: String,
}

impl NotifierConfig {
    /// Read mail settings from the environment. Returns `None` unless both the
    /// API key and the tutor address are set.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let api_key = env::var("RESEND_API_KEY").ok()?;
        let tutor_email = env::var("TUTOR_EMAIL").ok()?;
        if api_key.trim().is_empty() || tutor_email.trim().is_empty() {
            return None;
        }
        let base_url =
            env::var("PEERPILOT_MAIL_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.into());
        let from = env::var("PEERPILOT_MAIL_FROM").unwrap_or_else(|_| DEFAULT_FROM.into());
        Some(Self {
            base_url,
            api_key,
            from,
            tutor_email,
        })
    }
}

/// Sends notices through the Resend HTTP API.
#[derive(Clone)]
pub struct EmailNotifier {
    client: Client,
    config: Option<NotifierConfig>,
}

impl EmailNotifier {
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(NotifierConfig::from_env())
    }

    #[must_use]
    pub fn new(config: Option<NotifierConfig>) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|err| {
                tracing::warn!(error = %err, "mail client setup failed; using defaults");
                Client::new()
            });
        Self { client, config }
    }

    #[must_use]
    pub fn enabled(&self) -> bool {
        self.config.is_some()
    }
}

#[async_trait]
impl SessionNotifier for EmailNotifier {
    async fn notify(&self, notice: &SessionRequestNotice) -> Result<(), NotificationError> {
        let config = self
            .config
            .as_ref()
            .ok_or(NotificationError::Disabled)?;
        if notice.student_email.is_none() {
            return Err(NotificationError::MissingContact);
        }

        let url = format!("{}/emails", config.base_url.trim_end_matches('/'));
        let payload = EmailRequest {
            from: &config.from,
            to: vec![config.tutor_email.as_str()],
            subject: notice.subject(),
            html: notice.html_body(),
        };

        let response = self
            .client
            .post(url)
            .bearer_auth(&config.api_key)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(NotificationError::HttpStatus(response.status()));
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct EmailRequest<'a> {
    from: &'a str,
    to: Vec<&'a str>,
    subject: String,
    html: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use peerpilot_core::model::{SessionRequestDraft, SessionRequestId};
    use peerpilot_core::time::fixed_now;

    fn notice(note: Option<&str>) -> SessionRequestNotice {
        let details = SessionRequestDraft {
            tutor_id: "britton-bloch".into(),
            tutor_name: "Britton Bloch".into(),
            topic: "Geometry".into(),
            goal: "Proofs <b>fast</b>".into(),
            duration: "30 min".into(),
            day: "Tuesday".into(),
            time: "5:00 PM".into(),
            note: note.map(Into::into),
        }
        .validate()
        .unwrap();
        let request = SessionRequest::new(SessionRequestId::new("sr_abc12345"), fixed_now(), details);
        let student = Student::new("Maya Chen", Some("maya@example.com".into()));
        SessionRequestNotice::new(&student, &request)
    }

    #[test]
    fn subject_names_the_topic() {
        assert_eq!(notice(None).subject(), "New Session Request: Geometry");
    }

    #[test]
    fn body_escapes_user_text() {
        let html = notice(Some("see you <script>")).html_body();
        // clean_text also escapes spaces.
        assert!(html.contains("<strong>Student:</strong> Maya&#32;Chen"));
        assert!(html.contains("Proofs&#32;&lt;b&gt;fast&lt;&#47;b&gt;"));
        assert!(html.contains("Tuesday&#32;@&#32;5:00&#32;PM"));
        assert!(html.contains("Student Note:"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn body_omits_missing_note() {
        assert!(!notice(None).html_body().contains("Student Note"));
    }

    #[tokio::test]
    async fn disabled_notifier_fails() {
        let notifier = EmailNotifier::new(None);
        assert!(!notifier.enabled());
        let err = notifier.notify(&notice(None)).await.unwrap_err();
        assert!(matches!(err, NotificationError::Disabled));
    }
}
