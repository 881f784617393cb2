use std::collections::BTreeSet;

use crate::model::ids::{ResourceId, SessionId};

/// Sessions the student is attending. Only positive RSVPs are held; a
/// cancelled RSVP is removed rather than recorded as `false`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RsvpSet {
    sessions: BTreeSet<SessionId>,
}

impl RsvpSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from persisted `(session, attending)` flags, dropping falsy ones.
    pub fn from_flags(flags: impl IntoIterator<Item = (SessionId, bool)>) -> Self {
        let sessions = flags
            .into_iter()
            .filter_map(|(id, attending)| attending.then_some(id))
            .collect();
        Self { sessions }
    }

    /// Flip the RSVP for `session`. Returns `true` if the student is now attending.
    pub fn toggle(&mut self, session: &SessionId) -> bool {
        if self.sessions.remove(session) {
            false
        } else {
            self.sessions.insert(session.clone());
            true
        }
    }

    #[must_use]
    pub fn is_attending(&self, session: &SessionId) -> bool {
        self.sessions.contains(session)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SessionId> {
        self.sessions.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

/// Bookmarked resource ids in the order they were saved, without duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SavedResourceSet {
    ids: Vec<ResourceId>,
}

impl SavedResourceSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from persisted ids; repeated ids keep their first position.
    pub fn from_ids(ids: impl IntoIterator<Item = ResourceId>) -> Self {
        let mut set = Self::new();
        for id in ids {
            if !set.contains(&id) {
                set.ids.push(id);
            }
        }
        set
    }

    /// Flip membership of `id`. Returns `true` if the resource is now saved.
    pub fn toggle(&mut self, id: &ResourceId) -> bool {
        if let Some(pos) = self.ids.iter().position(|saved| saved == id) {
            self.ids.remove(pos);
            false
        } else {
            self.ids.push(id.clone());
            true
        }
    }

    #[must_use]
    pub fn contains(&self, id: &ResourceId) -> bool {
        self.ids.contains(id)
    }

    #[must_use]
    pub fn ids(&self) -> &[ResourceId] {
        &self.ids
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rsvp_toggle_prunes_instead_of_storing_false() {
        let mut rsvps = RsvpSet::new();
        let s1 = SessionId::new("s1");
        assert!(rsvps.toggle(&s1));
        assert!(rsvps.is_attending(&s1));
        assert!(!rsvps.toggle(&s1));
        assert!(rsvps.is_empty());
    }

    #[test]
    fn rsvp_from_flags_drops_falsy_entries() {
        let rsvps = RsvpSet::from_flags([
            (SessionId::new("s1"), true),
            (SessionId::new("s2"), false),
        ]);
        assert_eq!(rsvps.len(), 1);
        assert!(!rsvps.is_attending(&SessionId::new("s2")));
    }

    #[test]
    fn saved_toggle_twice_restores_order() {
        let mut saved = SavedResourceSet::from_ids([ResourceId::new("r1"), ResourceId::new("r2")]);
        let before = saved.clone();
        let r3 = ResourceId::new("r3");
        assert!(saved.toggle(&r3));
        assert!(!saved.toggle(&r3));
        assert_eq!(saved, before);
    }

    #[test]
    fn saved_from_ids_collapses_duplicates() {
        let saved = SavedResourceSet::from_ids([
            ResourceId::new("r2"),
            ResourceId::new("r1"),
            ResourceId::new("r2"),
        ]);
        assert_eq!(saved.ids(), &[ResourceId::new("r2"), ResourceId::new("r1")]);
    }
}
