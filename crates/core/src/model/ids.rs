use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

// ─── String-backed identifiers ─────────────────────────────────────────────────

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({:?})"), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.pad(&self.0)
            }
        }

        impl FromStr for $name {
            type Err = ParseIdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Err(ParseIdError {
                        kind: stringify!($name).to_string(),
                    });
                }
                Ok(Self(trimmed.to_string()))
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self::new(value)
            }
        }
    };
}

string_id!(
    /// Unique slug of a catalog quiz, e.g. `algebra-basics`.
    QuizSlug
);
string_id!(
    /// Identifier of a catalog resource, e.g. `r1`.
    ResourceId
);
string_id!(
    /// Identifier of a scheduled tutoring or group-study session, e.g. `s1`.
    SessionId
);
string_id!(
    /// Identifier of a tutor, e.g. `rey-garg`.
    TutorId
);
string_id!(
    /// Identifier of a stored session request, e.g. `sr_k3j9x0aa`.
    SessionRequestId
);

/// Unique identifier for a stored quiz attempt.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttemptId(Uuid);

impl AttemptId {
    #[must_use]
    pub fn new(id: Uuid) -> Self {
        Self(id)
    }

    /// Generates a fresh random id.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    #[must_use]
    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl fmt::Debug for AttemptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AttemptId({})", self.0)
    }
}

impl fmt::Display for AttemptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for AttemptId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim())
            .map(AttemptId::new)
            .map_err(|_| ParseIdError {
                kind: "AttemptId".to_string(),
            })
    }
}

// ─── Parse errors ──────────────────────────────────────────────────────────────

/// Error type for parsing an identifier from a string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIdError {
    kind: String,
}

impl fmt::Display for ParseIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to parse {} from string", self.kind)
    }
}

impl std::error::Error for ParseIdError {}

// ─── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_display_is_raw_value() {
        let slug = QuizSlug::new("algebra-basics");
        assert_eq!(slug.to_string(), "algebra-basics");
        assert_eq!(format!("{slug:?}"), "QuizSlug(\"algebra-basics\")");
    }

    #[test]
    fn string_id_from_str_trims_and_rejects_blank() {
        let id: SessionId = "  s1 ".parse().unwrap();
        assert_eq!(id, SessionId::new("s1"));
        assert!("   ".parse::<ResourceId>().is_err());
    }

    #[test]
    fn attempt_id_parses_uuid() {
        let id = AttemptId::generate();
        let parsed: AttemptId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
        assert!("not-a-uuid".parse::<AttemptId>().is_err());
    }

    #[test]
    fn string_ids_serialize_as_plain_strings() {
        let json = serde_json::to_string(&TutorId::new("rey-garg")).unwrap();
        assert_eq!(json, "\"rey-garg\"");
    }
}
