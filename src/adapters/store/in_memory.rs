//! In-memory record store.
//!
//! Holds collections in process memory behind a tokio `RwLock`. Every write
//! bumps the record revision and pushes a fresh ordered snapshot to each live
//! feed while the write lock is still held, so feeds observe writes in the
//! order they were applied. Useful for tests, the demo binary and
//! single-process deployments.

use async_trait::async_trait;
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};
use uuid::Uuid;

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::ports::{ChangeFeed, Fields, Record, RecordStore};

struct Watcher {
    order_field: String,
    tx: mpsc::UnboundedSender<Vec<Record>>,
}

#[derive(Default)]
struct Collection {
    records: HashMap<String, Record>,
    watchers: Vec<Watcher>,
}

impl Collection {
    fn ordered(&self, order_field: &str) -> Vec<Record> {
        let mut records: Vec<Record> = self
            .records
            .values()
            .filter(|r| r.fields.contains_key(order_field))
            .cloned()
            .collect();
        records.sort_by(|a, b| {
            compare_values(&a.fields[order_field], &b.fields[order_field])
                .then_with(|| a.id.cmp(&b.id))
        });
        records
    }

    fn notify(&mut self) {
        let snapshots: Vec<Vec<Record>> = self
            .watchers
            .iter()
            .map(|w| self.ordered(&w.order_field))
            .collect();
        let mut delivered = snapshots.into_iter();
        self.watchers
            .retain(|w| delivered.next().is_some_and(|s| w.tx.send(s).is_ok()));
    }

    fn record_mut(&mut self, id: &str) -> Result<&mut Record, DomainError> {
        self.records.get_mut(id).ok_or_else(|| not_found(id))
    }
}

/// Value ordering used for ordered reads.
///
/// Types rank null < bool < number < string < array < object; within a type
/// numbers compare numerically and strings lexicographically.
fn compare_values(a: &Value, b: &Value) -> Ordering {
    fn rank(v: &Value) -> u8 {
        match v {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Number(_) => 2,
            Value::String(_) => 3,
            Value::Array(_) => 4,
            Value::Object(_) => 5,
        }
    }

    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => {
            let (x, y) = (x.as_f64().unwrap_or(0.0), y.as_f64().unwrap_or(0.0));
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Value::String(x), Value::String(y)) => x.cmp(y),
        _ => rank(a).cmp(&rank(b)),
    }
}

fn not_found(id: &str) -> DomainError {
    DomainError::new(ErrorCode::RecordNotFound, format!("Record not found: {}", id))
        .with_detail("record_id", id)
}

/// In-memory implementation of [`RecordStore`].
#[derive(Clone, Default)]
pub struct InMemoryRecordStore {
    collections: Arc<RwLock<HashMap<String, Collection>>>,
    offline: Arc<AtomicBool>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulates an outage: every call fails with `DatabaseError` until
    /// cleared. Live feeds stay connected.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, AtomicOrdering::SeqCst);
    }

    /// Number of records in a collection.
    pub async fn record_count(&self, collection: &str) -> usize {
        self.collections
            .read()
            .await
            .get(collection)
            .map_or(0, |c| c.records.len())
    }

    /// Number of live feeds on a collection.
    pub async fn feed_count(&self, collection: &str) -> usize {
        self.collections
            .read()
            .await
            .get(collection)
            .map_or(0, |c| c.watchers.iter().filter(|w| !w.tx.is_closed()).count())
    }

    /// Inserts a record under a chosen id, replacing any existing one.
    ///
    /// Used to seed fixtures, including documents the codec must tolerate.
    pub async fn insert_raw(&self, collection: &str, id: &str, fields: Fields) {
        let mut collections = self.collections.write().await;
        let coll = collections.entry(collection.to_string()).or_default();
        let revision = coll.records.get(id).map_or(1, |r| r.revision + 1);
        coll.records.insert(
            id.to_string(),
            Record {
                id: id.to_string(),
                revision,
                fields,
            },
        );
        coll.notify();
    }

    fn ensure_online(&self) -> Result<(), DomainError> {
        if self.offline.load(AtomicOrdering::SeqCst) {
            Err(DomainError::new(
                ErrorCode::DatabaseError,
                "Record store unavailable",
            ))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn create(&self, collection: &str, fields: Fields) -> Result<String, DomainError> {
        self.ensure_online()?;
        let id = Uuid::new_v4().simple().to_string();

        let mut collections = self.collections.write().await;
        let coll = collections.entry(collection.to_string()).or_default();
        coll.records.insert(
            id.clone(),
            Record {
                id: id.clone(),
                revision: 1,
                fields,
            },
        );
        coll.notify();
        Ok(id)
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Record>, DomainError> {
        self.ensure_online()?;
        Ok(self
            .collections
            .read()
            .await
            .get(collection)
            .and_then(|c| c.records.get(id))
            .cloned())
    }

    async fn list(&self, collection: &str, order_field: &str) -> Result<Vec<Record>, DomainError> {
        self.ensure_online()?;
        Ok(self
            .collections
            .read()
            .await
            .get(collection)
            .map(|c| c.ordered(order_field))
            .unwrap_or_default())
    }

    async fn update_fields(
        &self,
        collection: &str,
        id: &str,
        fields: Fields,
    ) -> Result<u64, DomainError> {
        self.ensure_online()?;
        let mut collections = self.collections.write().await;
        let coll = collections
            .get_mut(collection)
            .ok_or_else(|| not_found(id))?;

        let record = coll.record_mut(id)?;
        record.fields.extend(fields);
        record.revision += 1;
        let revision = record.revision;
        coll.notify();
        Ok(revision)
    }

    async fn update_fields_if(
        &self,
        collection: &str,
        id: &str,
        expected_revision: u64,
        fields: Fields,
    ) -> Result<u64, DomainError> {
        self.ensure_online()?;
        let mut collections = self.collections.write().await;
        let coll = collections
            .get_mut(collection)
            .ok_or_else(|| not_found(id))?;

        let record = coll.record_mut(id)?;
        if record.revision != expected_revision {
            return Err(DomainError::new(
                ErrorCode::RevisionConflict,
                format!(
                    "Record {} is at revision {}, expected {}",
                    id, record.revision, expected_revision
                ),
            )
            .with_detail("record_id", id));
        }
        record.fields.extend(fields);
        record.revision += 1;
        let revision = record.revision;
        coll.notify();
        Ok(revision)
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), DomainError> {
        self.ensure_online()?;
        let mut collections = self.collections.write().await;
        let coll = collections
            .get_mut(collection)
            .ok_or_else(|| not_found(id))?;

        coll.records.remove(id).ok_or_else(|| not_found(id))?;
        coll.notify();
        Ok(())
    }

    async fn subscribe(
        &self,
        collection: &str,
        order_field: &str,
    ) -> Result<ChangeFeed, DomainError> {
        self.ensure_online()?;
        let (tx, rx) = mpsc::unbounded_channel();

        let mut collections = self.collections.write().await;
        let coll = collections.entry(collection.to_string()).or_default();
        // Initial snapshot goes out before any later write can interleave.
        let _ = tx.send(coll.ordered(order_field));
        coll.watchers.push(Watcher {
            order_field: order_field.to_string(),
            tx,
        });
        Ok(rx)
    }

    async fn array_union(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        element: Value,
        key_field: &str,
    ) -> Result<bool, DomainError> {
        self.ensure_online()?;
        let mut collections = self.collections.write().await;
        let coll = collections
            .get_mut(collection)
            .ok_or_else(|| not_found(id))?;

        let record = coll.record_mut(id)?;
        let key = element.get(key_field).cloned();
        let slot = record
            .fields
            .entry(field.to_string())
            .or_insert_with(|| Value::Array(Vec::new()));
        let Value::Array(items) = slot else {
            return Err(DomainError::new(
                ErrorCode::ValidationFailed,
                format!("Field '{}' of {} is not an array", field, id),
            ));
        };
        if items.iter().any(|item| item.get(key_field).cloned() == key) {
            return Ok(false);
        }
        items.push(element);
        record.revision += 1;
        coll.notify();
        Ok(true)
    }
}
