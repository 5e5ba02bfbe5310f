//! Mock auth provider for tests and the demo binary.
//!
//! # Example
//!
//! ```ignore
//! use mentor_roster::adapters::auth::MockAuthProvider;
//!
//! let auth = MockAuthProvider::new().signed_in_as_test_user(UserId::new("alice").unwrap());
//! let user = auth.current_user().await?;
//! ```

use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, AuthenticatedUser, Role, UserId};
use crate::ports::AuthProvider;

/// Auth provider whose signed-in user is set by the test.
#[derive(Debug, Default)]
pub struct MockAuthProvider {
    /// The signed-in user, if any
    current: RwLock<Option<AuthenticatedUser>>,
    /// Optional error to return for every call (for error testing)
    force_error: RwLock<Option<AuthError>>,
}

impl MockAuthProvider {
    /// Creates a provider with nobody signed in.
    pub fn new() -> Self {
        Self::default()
    }

    /// Signs in the given user.
    pub fn signed_in_as(self, user: AuthenticatedUser) -> Self {
        self.sign_in(user);
        self
    }

    /// Signs in a simple test user with a derived email and no display name.
    pub fn signed_in_as_test_user(self, user_id: UserId) -> Self {
        self.signed_in_as(test_user(user_id, Role::User))
    }

    /// Signs in a test admin.
    pub fn signed_in_as_admin(self, user_id: UserId) -> Self {
        self.signed_in_as(test_user(user_id, Role::Admin))
    }

    /// Forces every call to return the specified error.
    pub fn with_error(self, error: AuthError) -> Self {
        *self
            .force_error
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(error);
        self
    }

    /// Clears the forced error.
    pub fn clear_error(&self) {
        *self
            .force_error
            .write()
            .unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Changes the signed-in user at runtime.
    pub fn sign_in(&self, user: AuthenticatedUser) {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Some(user);
    }

    pub fn sign_out(&self) {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

fn test_user(user_id: UserId, role: Role) -> AuthenticatedUser {
    let email = format!("{}@test.example.com", user_id);
    AuthenticatedUser::new(
        user_id,
        email,
        None,
        role,
    )
}

#[async_trait]
impl AuthProvider for MockAuthProvider {
    async fn current_user(&self) -> Result<Option<AuthenticatedUser>, AuthError> {
        if let Some(error) = self
            .force_error
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
        {
            return Err(error);
        }

        Ok(self
            .current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }
}
