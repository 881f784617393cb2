//! Read-only reference data: quizzes, resources, tutors and the session schedule.
//!
//! Consumers depend on the [`Catalog`] trait; [`StaticCatalog`] is the built-in
//! dataset, validated once when it is loaded.

mod data;

use std::collections::{BTreeMap, HashSet};
use std::hash::Hash;

use thiserror::Error;

use crate::model::{
    Quiz, QuizError, QuizSlug, Resource, ResourceId, ScheduledSession, SessionId, Topic, Tutor,
    TutorId,
};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("quiz {slug}: {source}")]
    Quiz {
        slug: String,
        #[source]
        source: QuizError,
    },

    #[error("duplicate {kind} id: {id}")]
    Duplicate { kind: &'static str, id: String },

    #[error("resource {id} has an invalid url: {reason}")]
    InvalidUrl { id: String, reason: String },

    #[error("{owner} references unknown tutor {tutor}")]
    UnknownTutor { owner: String, tutor: String },

    #[error("session {id} has more spots left than spots total")]
    SpotsExceedTotal { id: String },
}

/// Lookup interface over immutable reference data.
pub trait Catalog: Send + Sync {
    fn quizzes(&self) -> &[Quiz];

    fn resources(&self) -> &[Resource];

    fn tutors(&self) -> &[Tutor];

    fn sessions(&self) -> &[ScheduledSession];

    /// Tutors assigned to `topic`, in assignment order.
    fn tutors_for_topic(&self, topic: Topic) -> Vec<&Tutor>;

    fn quiz(&self, slug: &QuizSlug) -> Option<&Quiz> {
        self.quizzes().iter().find(|quiz| quiz.slug() == slug)
    }

    fn resource(&self, id: &ResourceId) -> Option<&Resource> {
        self.resources().iter().find(|resource| &resource.id == id)
    }

    fn tutor(&self, id: &TutorId) -> Option<&Tutor> {
        self.tutors().iter().find(|tutor| &tutor.id == id)
    }

    fn session(&self, id: &SessionId) -> Option<&ScheduledSession> {
        self.sessions().iter().find(|session| &session.id == id)
    }
}

/// In-memory catalog built from validated data.
#[derive(Debug, Clone)]
pub struct StaticCatalog {
    quizzes: Vec<Quiz>,
    resources: Vec<Resource>,
    tutors: Vec<Tutor>,
    sessions: Vec<ScheduledSession>,
    topic_tutors: BTreeMap<Topic, Vec<TutorId>>,
}

impl StaticCatalog {
    /// Assemble a catalog, checking cross-entity consistency.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` on duplicate ids, dangling tutor references, or
    /// sessions with impossible capacity.
    pub fn new(
        quizzes: Vec<Quiz>,
        resources: Vec<Resource>,
        tutors: Vec<Tutor>,
        sessions: Vec<ScheduledSession>,
        topic_tutors: BTreeMap<Topic, Vec<TutorId>>,
    ) -> Result<Self, CatalogError> {
        ensure_unique("quiz", quizzes.iter().map(Quiz::slug))?;
        ensure_unique("resource", resources.iter().map(|r| &r.id))?;
        ensure_unique("tutor", tutors.iter().map(|t| &t.id))?;
        ensure_unique("session", sessions.iter().map(|s| &s.id))?;

        let known: HashSet<&TutorId> = tutors.iter().map(|t| &t.id).collect();
        for (topic, assigned) in &topic_tutors {
            if let Some(missing) = assigned.iter().find(|id| !known.contains(id)) {
                return Err(CatalogError::UnknownTutor {
                    owner: format!("topic {topic}"),
                    tutor: missing.to_string(),
                });
            }
        }
        for resource in &resources {
            if let Some(missing) = resource.tutors.iter().find(|id| !known.contains(id)) {
                return Err(CatalogError::UnknownTutor {
                    owner: format!("resource {}", resource.id),
                    tutor: missing.to_string(),
                });
            }
        }
        if let Some(session) = sessions.iter().find(|s| s.spots_left > s.spots_total) {
            return Err(CatalogError::SpotsExceedTotal {
                id: session.id.to_string(),
            });
        }

        Ok(Self {
            quizzes,
            resources,
            tutors,
            sessions,
            topic_tutors,
        })
    }

    /// The bundled PeerPilot dataset.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the bundled data fails validation.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::new(
            data::quizzes()?,
            data::resources()?,
            data::tutors(),
            data::sessions(),
            data::topic_tutors(),
        )
    }
}

impl Catalog for StaticCatalog {
    fn quizzes(&self) -> &[Quiz] {
        &self.quizzes
    }

    fn resources(&self) -> &[Resource] {
        &self.resources
    }

    fn tutors(&self) -> &[Tutor] {
        &self.tutors
    }

    fn sessions(&self) -> &[ScheduledSession] {
        &self.sessions
    }

    fn tutors_for_topic(&self, topic: Topic) -> Vec<&Tutor> {
        self.topic_tutors
            .get(&topic)
            .map(|ids| ids.iter().filter_map(|id| self.tutor(id)).collect())
            .unwrap_or_default()
    }
}

fn ensure_unique<'a, T>(
    kind: &'static str,
    ids: impl Iterator<Item = &'a T>,
) -> Result<(), CatalogError>
where
    T: Eq + Hash + ToString + 'a,
{
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(CatalogError::Duplicate {
                kind,
                id: id.to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_is_valid() {
        let catalog = StaticCatalog::builtin().unwrap();
        assert_eq!(catalog.quizzes().len(), 2);
        assert_eq!(catalog.resources().len(), 8);
        assert_eq!(catalog.tutors().len(), 6);
        assert_eq!(catalog.sessions().len(), 5);
    }

    #[test]
    fn looks_up_by_slug_and_id() {
        let catalog = StaticCatalog::builtin().unwrap();
        let quiz = catalog.quiz(&QuizSlug::new("algebra-basics")).unwrap();
        assert_eq!(quiz.len(), 5);
        assert!(catalog.quiz(&QuizSlug::new("calculus")).is_none());
        assert_eq!(
            catalog.resource(&ResourceId::new("r4")).unwrap().topic,
            Topic::Trig
        );
        assert_eq!(
            catalog.session(&SessionId::new("s1")).unwrap().title,
            "1:1 Algebra Help"
        );
    }

    #[test]
    fn topic_mapping_resolves_tutors_in_order() {
        let catalog = StaticCatalog::builtin().unwrap();
        let names: Vec<_> = catalog
            .tutors_for_topic(Topic::Geometry)
            .into_iter()
            .map(|t| t.name.as_str())
            .collect();
        assert_eq!(names, ["Britton Bloch", "Brody Shnayder"]);
    }

    #[test]
    fn rejects_dangling_topic_tutor() {
        let mut mapping = BTreeMap::new();
        mapping.insert(Topic::Algebra, vec![TutorId::new("nobody")]);
        let err = StaticCatalog::new(Vec::new(), Vec::new(), Vec::new(), Vec::new(), mapping)
            .unwrap_err();
        assert!(matches!(err, CatalogError::UnknownTutor { .. }));
    }

    #[test]
    fn rejects_duplicate_sessions() {
        let mut sessions = data::sessions();
        sessions.push(sessions[0].clone());
        let err = StaticCatalog::new(Vec::new(), Vec::new(), Vec::new(), sessions, BTreeMap::new())
            .unwrap_err();
        assert_eq!(
            err,
            CatalogError::Duplicate {
                kind: "session",
                id: "s1".into()
            }
        );
    }
}
