//! In-memory profile directory.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode, UserId};
use crate::domain::user::UserProfile;
use crate::ports::ProfileDirectory;

/// Profile directory backed by a map, ordered by uid.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProfileDirectory {
    profiles: Arc<RwLock<BTreeMap<UserId, UserProfile>>>,
    failure: Arc<RwLock<Option<String>>>,
}

impl InMemoryProfileDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Directory whose every lookup fails with `DatabaseError`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            profiles: Arc::default(),
            failure: Arc::new(RwLock::new(Some(message.into()))),
        }
    }

    /// Adds or replaces a profile.
    pub async fn upsert(&self, profile: UserProfile) {
        self.profiles
            .write()
            .await
            .insert(profile.uid.clone(), profile);
    }

    pub async fn remove(&self, uid: &UserId) {
        self.profiles.write().await.remove(uid);
    }

    pub async fn len(&self) -> usize {
        self.profiles.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.profiles.read().await.is_empty()
    }

    async fn check_available(&self) -> Result<(), DomainError> {
        match self.failure.read().await.as_ref() {
            Some(message) => Err(DomainError::new(ErrorCode::DatabaseError, message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ProfileDirectory for InMemoryProfileDirectory {
    async fn get_profile(&self, uid: &UserId) -> Result<Option<UserProfile>, DomainError> {
        self.check_available().await?;
        Ok(self.profiles.read().await.get(uid).cloned())
    }

    async fn list_profiles(&self) -> Result<Vec<UserProfile>, DomainError> {
        self.check_available().await?;
        Ok(self.profiles.read().await.values().cloned().collect())
    }
}
