use std::fmt;
use std::str::FromStr;

use url::Url;

use crate::model::ids::{ResourceId, TutorId};
use crate::model::topic::{ParseLabelError, Topic};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceType {
    Lesson,
    Video,
    Practice,
    Download,
}

impl ResourceType {
    pub const ALL: [ResourceType; 4] = [
        ResourceType::Lesson,
        ResourceType::Video,
        ResourceType::Practice,
        ResourceType::Download,
    ];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            ResourceType::Lesson => "Lesson",
            ResourceType::Video => "Video",
            ResourceType::Practice => "Practice",
            ResourceType::Download => "Download",
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ResourceType {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        ResourceType::ALL
            .into_iter()
            .find(|kind| kind.label().eq_ignore_ascii_case(needle))
            .ok_or_else(|| ParseLabelError::new("resource type", s))
    }
}

/// High-school grade band a resource targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GradeBand {
    Ninth,
    Tenth,
    Eleventh,
    Twelfth,
}

impl GradeBand {
    #[must_use]
    pub fn number(self) -> u8 {
        match self {
            GradeBand::Ninth => 9,
            GradeBand::Tenth => 10,
            GradeBand::Eleventh => 11,
            GradeBand::Twelfth => 12,
        }
    }
}

impl fmt::Display for GradeBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

impl FromStr for GradeBand {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "9" => Ok(GradeBand::Ninth),
            "10" => Ok(GradeBand::Tenth),
            "11" => Ok(GradeBand::Eleventh),
            "12" => Ok(GradeBand::Twelfth),
            _ => Err(ParseLabelError::new("grade", s)),
        }
    }
}

/// A curated learning resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    pub id: ResourceId,
    pub title: String,
    pub kind: ResourceType,
    pub topic: Topic,
    pub grade: GradeBand,
    pub description: String,
    pub url: Url,
    pub tags: Vec<String>,
    pub tutors: Vec<TutorId>,
}

/// Browse filter for resources. `None` fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceFilter {
    pub topic: Option<Topic>,
    pub kind: Option<ResourceType>,
    pub grade: Option<GradeBand>,
    pub query: Option<String>,
}

impl ResourceFilter {
    /// Returns true when `resource` passes every set criterion.
    ///
    /// The query matches case-insensitively against title, description and tags.
    #[must_use]
    pub fn matches(&self, resource: &Resource) -> bool {
        if self.topic.is_some_and(|topic| topic != resource.topic) {
            return false;
        }
        if self.kind.is_some_and(|kind| kind != resource.kind) {
            return false;
        }
        if self.grade.is_some_and(|grade| grade != resource.grade) {
            return false;
        }

        let query = self
            .query
            .as_deref()
            .map(|q| q.trim().to_lowercase())
            .unwrap_or_default();
        if query.is_empty() {
            return true;
        }
        let haystack = format!(
            "{} {} {}",
            resource.title,
            resource.description,
            resource.tags.join(" ")
        )
        .to_lowercase();
        haystack.contains(&query)
    }
}
