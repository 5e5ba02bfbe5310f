//! Typed access to session records in the record store.
//!
//! Wraps the store port with the configured collection and ordering field,
//! decodes records into sessions and maps store errors onto `SessionError`.

use std::sync::Arc;

use tracing::warn;

use crate::config::StoreConfig;
use crate::domain::foundation::{DomainError, SessionId};
use crate::domain::session::{document, Session, SessionError, SessionList};
use crate::ports::{Record, RecordStore};

/// Session-shaped view over a [`RecordStore`] collection.
#[derive(Clone)]
pub struct SessionRecords {
    store: Arc<dyn RecordStore>,
    collection: Arc<str>,
    order_field: Arc<str>,
}

impl SessionRecords {
    pub fn new(store: Arc<dyn RecordStore>, config: &StoreConfig) -> Self {
        Self {
            store,
            collection: Arc::from(config.sessions_collection.as_str()),
            order_field: Arc::from(config.order_field.as_str()),
        }
    }

    pub fn store(&self) -> &dyn RecordStore {
        self.store.as_ref()
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn order_field(&self) -> &str {
        &self.order_field
    }

    /// Point read of one session.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no record has this id
    /// - `UpstreamUnavailable` if the store fails or the record is malformed
    pub async fn load(&self, id: &SessionId) -> Result<Session, SessionError> {
        let record = self
            .store
            .get(&self.collection, id.as_str())
            .await
            .map_err(|e| store_error(id, e))?
            .ok_or_else(|| SessionError::not_found(id.clone()))?;

        decode(&record).map_err(SessionError::from)
    }

    /// One-shot ordered read of every session. Malformed records are skipped.
    pub async fn list(&self) -> Result<SessionList, SessionError> {
        let records = self
            .store
            .list(&self.collection, &self.order_field)
            .await
            .map_err(SessionError::from)?;
        Ok(decode_list(records))
    }
}

/// Decodes one record, logging any merged duplicate roster entries.
pub fn decode(record: &Record) -> Result<Session, DomainError> {
    let id = SessionId::new(record.id.as_str())?;
    let decoded = document::decode(&id, record.revision, &record.fields)?;
    if decoded.merged_duplicates > 0 {
        warn!(
            session_id = %id,
            merged = decoded.merged_duplicates,
            "Collapsed duplicate roster entries"
        );
    }
    Ok(decoded.session)
}

/// Decodes a snapshot into an ordered list, skipping malformed records.
pub fn decode_list(records: Vec<Record>) -> SessionList {
    let sessions = records
        .iter()
        .filter_map(|record| match decode(record) {
            Ok(session) => Some(session),
            Err(err) => {
                warn!(record_id = %record.id, error = %err, "Skipping undecodable session record");
                None
            }
        })
        .collect();
    SessionList::new(sessions)
}

/// Maps a store error on a known session onto the session taxonomy.
pub fn store_error(id: &SessionId, err: DomainError) -> SessionError {
    if err.is_not_found() {
        SessionError::not_found(id.clone())
    } else if err.is_conflict() {
        SessionError::ConflictRetryable(id.clone())
    } else {
        SessionError::from(err)
    }
}
