use std::fmt;
use std::str::FromStr;

use crate::model::ids::{SessionId, TutorId};
use crate::model::topic::{ParseLabelError, Topic};

/// A peer tutor profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tutor {
    pub id: TutorId,
    pub name: String,
    pub role: String,
    pub headline: String,
    pub bio: String,
    pub topics: Vec<Topic>,
    pub strengths: Vec<String>,
    pub availability: String,
    pub photo: String,
}

impl Tutor {
    #[must_use]
    pub fn teaches(&self, topic: Topic) -> bool {
        self.topics.contains(&topic)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionKind {
    Tutoring,
    GroupStudy,
}

impl SessionKind {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            SessionKind::Tutoring => "Tutoring",
            SessionKind::GroupStudy => "Group Study",
        }
    }
}

impl fmt::Display for SessionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SessionKind {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tutoring" => Ok(SessionKind::Tutoring),
            "group study" | "group-study" | "group" => Ok(SessionKind::GroupStudy),
            _ => Err(ParseLabelError::new("session type", s)),
        }
    }
}

/// A scheduled tutoring or group-study slot students can RSVP to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledSession {
    pub id: SessionId,
    pub title: String,
    pub kind: SessionKind,
    pub level: Topic,
    pub day: String,
    pub time: String,
    pub location: String,
    pub spots_total: u32,
    pub spots_left: u32,
}

/// Schedule filter. `None` fields match everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionFilter {
    pub kind: Option<SessionKind>,
    pub level: Option<Topic>,
}

impl SessionFilter {
    #[must_use]
    pub fn matches(&self, session: &ScheduledSession) -> bool {
        self.kind.is_none_or(|kind| kind == session.kind)
            && self.level.is_none_or(|level| level == session.level)
    }
}
