//! User profile directory port.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::user::UserProfile;

/// Read access to user profiles maintained outside the roster system.
#[async_trait]
pub trait ProfileDirectory: Send + Sync {
    /// Looks up one profile. Returns `None` if the user has none.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` when the directory cannot be reached
    async fn get_profile(&self, uid: &UserId) -> Result<Option<UserProfile>, DomainError>;

    /// Every known profile, for admin user pickers.
    async fn list_profiles(&self) -> Result<Vec<UserProfile>, DomainError>;
}
