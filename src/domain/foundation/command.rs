//! Command infrastructure for roster and lifecycle handlers.
//!
//! Every command handler receives a `CommandMetadata` describing who is
//! acting, in which role, and which request the command belongs to. The role
//! is the binary admin/user flag supplied by the auth collaborator.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{AuthenticatedUser, Role, UserId};

/// Metadata context for command handlers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandMetadata {
    /// The user executing this command.
    pub user_id: UserId,

    /// Role of the acting user.
    pub role: Role,

    /// Links related operations across a single user request.
    #[serde(skip_serializing_if = "Option::is_none")]
    correlation_id: Option<String>,

    /// Source of this command (e.g., "admin-dashboard", "user-dashboard").
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<String>,
}

impl CommandMetadata {
    /// Creates command metadata for a user acting in the given role.
    pub fn new(user_id: UserId, role: Role) -> Self {
        Self {
            user_id,
            role,
            correlation_id: None,
            source: None,
        }
    }

    /// Metadata for an admin caller.
    pub fn admin(user_id: UserId) -> Self {
        Self::new(user_id, Role::Admin)
    }

    /// Metadata for a regular user caller.
    pub fn user(user_id: UserId) -> Self {
        Self::new(user_id, Role::User)
    }

    /// Metadata derived from the signed-in user.
    pub fn for_user(user: &AuthenticatedUser) -> Self {
        Self::new(user.id.clone(), user.role)
    }

    /// Builder: Add correlation ID for request tracing.
    pub fn with_correlation_id(mut self, id: impl Into<String>) -> Self {
        self.correlation_id = Some(id.into());
        self
    }

    /// Builder: Add source identifier.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Returns the correlation ID, generating one if not set.
    pub fn correlation_id(&self) -> String {
        self.correlation_id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string())
    }

    /// Returns the correlation ID only if explicitly set.
    pub fn correlation_id_opt(&self) -> Option<&str> {
        self.correlation_id.as_deref()
    }

    /// Returns the source if set.
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Returns true when the caller acts as an admin.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}
