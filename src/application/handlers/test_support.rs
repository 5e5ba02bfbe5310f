//! Fixtures shared by handler tests.

use std::sync::Arc;

use serde_json::{json, Value};

use crate::adapters::profile::InMemoryProfileDirectory;
use crate::adapters::store::InMemoryRecordStore;
use crate::config::StoreConfig;
use crate::domain::foundation::{CommandMetadata, SessionId, UserId};
use crate::ports::Fields;

use super::records::SessionRecords;

pub struct Fixture {
    pub store: Arc<InMemoryRecordStore>,
    pub profiles: Arc<InMemoryProfileDirectory>,
    pub records: SessionRecords,
}

impl Fixture {
    pub fn new() -> Self {
        let store = Arc::new(InMemoryRecordStore::new());
        let records = SessionRecords::new(store.clone(), &StoreConfig::default());
        Self {
            store,
            profiles: Arc::new(InMemoryProfileDirectory::new()),
            records,
        }
    }

    /// Seeds a session with the given raw participant entries.
    pub async fn seed(&self, id: &str, max: u32, participants: Value) -> SessionId {
        self.seed_at(id, "2026-01-01T10:00:00Z", max, participants)
            .await
    }

    pub async fn seed_at(&self, id: &str, at: &str, max: u32, participants: Value) -> SessionId {
        self.store
            .insert_raw("sessions", id, doc(at, max, participants))
            .await;
        SessionId::new(id).unwrap()
    }
}

pub fn doc(at: &str, max: u32, participants: Value) -> Fields {
    match json!({
        "mentorName": "Ada Lovelace",
        "room": "A1",
        "expertise": "General",
        "datetime": at,
        "maxParticipants": max,
        "status": "FREE",
        "participants": participants,
    }) {
        Value::Object(map) => map,
        _ => unreachable!(),
    }
}

pub fn uid(s: &str) -> UserId {
    UserId::new(s).unwrap()
}

pub fn admin() -> CommandMetadata {
    CommandMetadata::admin(uid("admin"))
}

pub fn user(s: &str) -> CommandMetadata {
    CommandMetadata::user(uid(s))
}
