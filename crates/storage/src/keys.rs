//! Storage key names for the four progress collections.
//!
//! The version suffix is the only schema marker: bumping it orphans data stored
//! under the previous key instead of migrating it.

pub const ATTEMPTS_KEY: &str = "peerpilot_quiz_scores_v1";
pub const RSVPS_KEY: &str = "peerpilot_rsvps_v1";
pub const SAVED_RESOURCES_KEY: &str = "peerpilot_saved_resources_v1";
pub const SESSION_REQUESTS_KEY: &str = "pp_session_requests_v1";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    pub attempts: String,
    pub rsvps: String,
    pub saved_resources: String,
    pub session_requests: String,
}

impl StorageKeys {
    /// Namespaces every key with `prefix`, so independent store sets can share
    /// one backend.
    #[must_use]
    pub fn with_prefix(prefix: &str) -> Self {
        Self {
            attempts: format!("{prefix}:{ATTEMPTS_KEY}"),
            rsvps: format!("{prefix}:{RSVPS_KEY}"),
            saved_resources: format!("{prefix}:{SAVED_RESOURCES_KEY}"),
            session_requests: format!("{prefix}:{SESSION_REQUESTS_KEY}"),
        }
    }
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            attempts: ATTEMPTS_KEY.to_string(),
            rsvps: RSVPS_KEY.to_string(),
            saved_resources: SAVED_RESOURCES_KEY.to_string(),
            session_requests: SESSION_REQUESTS_KEY.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefixed_keys_differ_from_defaults() {
        let default = StorageKeys::default();
        let prefixed = StorageKeys::with_prefix("tab-2");
        assert_eq!(prefixed.rsvps, "tab-2:peerpilot_rsvps_v1");
        assert_ne!(default.attempts, prefixed.attempts);
    }
}
