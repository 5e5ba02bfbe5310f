//! Record store port.
//!
//! A document store holding one record per session. Records are addressed by
//! collection name and id and carry a flat JSON field map plus a revision
//! counter bumped by every write.
//!
//! # Ordering
//!
//! `list` and `subscribe` order records by one field. Records missing that
//! field are left out. Strings compare lexicographically, numbers
//! numerically; ties are broken by id.

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::mpsc;

use crate::domain::foundation::DomainError;

/// Flat field map of a stored document.
pub type Fields = Map<String, Value>;

/// A stored document.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub id: String,
    /// Write counter; starts at 1 on creation.
    pub revision: u64,
    pub fields: Fields,
}

/// Push feed of complete ordered snapshots.
///
/// The first message is the snapshot at subscription time. Dropping the
/// receiver ends the subscription.
pub type ChangeFeed = mpsc::UnboundedReceiver<Vec<Record>>;

/// Document store used for session records.
///
/// Implementations must:
/// - bump `revision` on every successful write of any kind
/// - emit a fresh ordered snapshot to every live feed after each write
/// - report a missing record as `RecordNotFound`
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Creates a record and returns its new id.
    async fn create(&self, collection: &str, fields: Fields) -> Result<String, DomainError>;

    /// Point read. Returns `None` if the record does not exist.
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Record>, DomainError>;

    /// One-shot ordered read of a collection.
    async fn list(&self, collection: &str, order_field: &str) -> Result<Vec<Record>, DomainError>;

    /// Unconditional partial update (last write wins per field).
    ///
    /// # Errors
    ///
    /// - `RecordNotFound` if the record does not exist
    async fn update_fields(
        &self,
        collection: &str,
        id: &str,
        fields: Fields,
    ) -> Result<u64, DomainError>;

    /// Partial update applied only if the record is still at
    /// `expected_revision`. Returns the new revision.
    ///
    /// # Errors
    ///
    /// - `RecordNotFound` if the record does not exist
    /// - `RevisionConflict` if the record changed since it was read
    async fn update_fields_if(
        &self,
        collection: &str,
        id: &str,
        expected_revision: u64,
        fields: Fields,
    ) -> Result<u64, DomainError>;

    /// Deletes a record.
    ///
    /// # Errors
    ///
    /// - `RecordNotFound` if the record does not exist
    async fn delete(&self, collection: &str, id: &str) -> Result<(), DomainError>;

    /// Subscribes to ordered snapshots of a collection.
    async fn subscribe(&self, collection: &str, order_field: &str)
        -> Result<ChangeFeed, DomainError>;

    /// Appends `element` to the array `field` unless an element with the same
    /// `key_field` value is already present. Returns whether it was appended.
    ///
    /// # Errors
    ///
    /// - `RecordNotFound` if the record does not exist
    async fn array_union(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        element: Value,
        key_field: &str,
    ) -> Result<bool, DomainError>;
}
