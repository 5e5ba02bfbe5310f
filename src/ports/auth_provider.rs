//! Auth provider port.
//!
//! Reports who is signed in on this client. The roster logic only reads the
//! answer; credential management lives entirely behind this port.

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, AuthenticatedUser};

/// Read-only view of the current caller.
///
/// # Contract
///
/// Implementations must:
/// - Return `Ok(None)` when nobody is signed in
/// - Return `AuthError::ServiceUnavailable` for transient errors
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// The signed-in user, if any.
    async fn current_user(&self) -> Result<Option<AuthenticatedUser>, AuthError>;
}
