use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Subject area shared by quizzes, resources, sessions and tutors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Topic {
    Algebra,
    Geometry,
    Trig,
    Precalc,
    Statistics,
    #[serde(rename = "SAT/PSAT")]
    SatPsat,
    #[serde(rename = "APPrecalculus Review: Sinusoidal Curves")]
    ApPrecalcSinusoidal,
}

impl Topic {
    pub const ALL: [Topic; 7] = [
        Topic::Algebra,
        Topic::Geometry,
        Topic::Trig,
        Topic::Precalc,
        Topic::Statistics,
        Topic::SatPsat,
        Topic::ApPrecalcSinusoidal,
    ];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Topic::Algebra => "Algebra",
            Topic::Geometry => "Geometry",
            Topic::Trig => "Trig",
            Topic::Precalc => "Precalc",
            Topic::Statistics => "Statistics",
            Topic::SatPsat => "SAT/PSAT",
            Topic::ApPrecalcSinusoidal => "APPrecalculus Review: Sinusoidal Curves",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown {kind}: {raw}")]
pub struct ParseLabelError {
    kind: &'static str,
    raw: String,
}

impl ParseLabelError {
    pub(crate) fn new(kind: &'static str, raw: &str) -> Self {
        Self {
            kind,
            raw: raw.to_string(),
        }
    }
}

impl FromStr for Topic {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        let alias = match needle.as_str() {
            "sat" | "psat" | "sat-psat" => Some(Topic::SatPsat),
            "stats" => Some(Topic::Statistics),
            "ap-precalc" | "sinusoidal" => Some(Topic::ApPrecalcSinusoidal),
            _ => None,
        };
        alias
            .or_else(|| {
                Topic::ALL
                    .into_iter()
                    .find(|topic| topic.label().to_ascii_lowercase() == needle)
            })
            .ok_or_else(|| ParseLabelError::new("topic", s))
    }
}
