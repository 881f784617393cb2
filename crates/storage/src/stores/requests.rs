use std::sync::Arc;

use peerpilot_core::Clock;
use peerpilot_core::model::{NewSessionRequest, SessionRequest, SessionRequestId};
use rand::Rng;
use tracing::warn;

use super::cell::JsonCell;
use crate::records::SessionRequestRecord;
use crate::repository::KeyValueBackend;

const ID_PREFIX: &str = "sr_";
const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const ID_LEN: usize = 8;

/// Submitted tutoring session requests, newest first.
///
/// The store owns id and timestamp assignment.
#[derive(Clone)]
pub struct SessionRequestStore {
    cell: JsonCell<Vec<SessionRequestRecord>>,
    clock: Clock,
}

impl SessionRequestStore {
    #[must_use]
    pub fn new(backend: Arc<dyn KeyValueBackend>, key: &str, clock: Clock) -> Self {
        Self {
            cell: JsonCell::new(backend, key),
            clock,
        }
    }

    pub async fn all(&self) -> Vec<SessionRequest> {
        self.cell
            .load_each()
            .await
            .into_iter()
            .filter_map(|record| {
                let id = record.id.clone();
                record
                    .into_request()
                    .map_err(|err| warn!(request = %id, error = %err, "skipping invalid request"))
                    .ok()
            })
            .collect()
    }

    /// Stamp `details` with a fresh id and the current time, and prepend it.
    ///
    /// The returned collection always starts with the new request, even when
    /// the backend drops the write.
    pub async fn add(&self, details: NewSessionRequest) -> Vec<SessionRequest> {
        self.insert(details).await.1
    }

    /// Same as [`add`](Self::add), also handing back the new request.
    pub async fn insert(&self, details: NewSessionRequest) -> (SessionRequest, Vec<SessionRequest>) {
        let existing = self.all().await;
        let id = loop {
            let candidate = generate_id();
            if existing.iter().all(|r| r.id() != &candidate) {
                break candidate;
            }
        };

        let request = SessionRequest::new(id, self.clock.now(), details);
        let mut next = Vec::with_capacity(existing.len() + 1);
        next.push(request.clone());
        next.extend(existing);
        self.replace_all(&next).await;
        (request, next)
    }

    /// Drop the request with `id`. Unknown ids leave storage untouched.
    pub async fn remove(&self, id: &SessionRequestId) -> Vec<SessionRequest> {
        let mut all = self.all().await;
        let before = all.len();
        all.retain(|r| r.id() != id);
        if all.len() != before {
            self.replace_all(&all).await;
        }
        all
    }

    pub async fn replace_all(&self, requests: &[SessionRequest]) {
        let records: Vec<_> = requests
            .iter()
            .map(SessionRequestRecord::from_request)
            .collect();
        self.cell.save(&records).await;
    }

    pub async fn clear(&self) {
        self.cell.clear().await;
    }
}

fn generate_id() -> SessionRequestId {
    let mut rng = rand::rng();
    let suffix: String = (0..ID_LEN)
        .map(|_| char::from(ID_ALPHABET[rng.random_range(0..ID_ALPHABET.len())]))
        .collect();
    SessionRequestId::new(format!("{ID_PREFIX}{suffix}"))
}
