//! Authentication types for the domain layer.
//!
//! These types describe the signed-in caller as reported by the auth
//! collaborator. The roster logic reads them and never mutates credentials.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use super::UserId;

/// Binary role supplied by the auth collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    User,
}

impl Role {
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::User => write!(f, "user"),
        }
    }
}

/// Authenticated user as reported by the auth collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// The unique user identifier from the auth provider.
    pub id: UserId,

    /// User's email address.
    pub email: String,

    /// Display name if the auth provider has one.
    pub display_name: Option<String>,

    /// Admin or regular user.
    pub role: Role,
}

impl AuthenticatedUser {
    /// Creates a new authenticated user.
    pub fn new(
        id: UserId,
        email: impl Into<String>,
        display_name: Option<String>,
        role: Role,
    ) -> Self {
        Self {
            id,
            email: email.into(),
            display_name,
            role,
        }
    }

    /// Returns the display name only when it has visible content.
    pub fn non_empty_display_name(&self) -> Option<&str> {
        self.display_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}

/// Authentication errors reported by the auth collaborator.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    /// Nobody is signed in.
    #[error("No authenticated user")]
    NotSignedIn,

    /// The authentication service is unavailable (network, config, etc.).
    #[error("Auth service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AuthError {
    /// Creates a service unavailable error with a message.
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable(message.into())
    }

    /// Returns true if this is a transient error that may succeed on retry.
    pub fn is_transient(&self) -> bool {
        matches!(self, AuthError::ServiceUnavailable(_))
    }
}
