//! Command and query handlers.
//!
//! Each handler owns its collaborators, receives a command plus
//! `CommandMetadata`, and returns a result or a `SessionError`.

pub mod records;
pub mod roster;
pub mod session;
pub mod user;

#[cfg(test)]
pub(crate) mod test_support;

pub use records::SessionRecords;

use crate::domain::foundation::{CommandMetadata, UserId};
use crate::domain::session::SessionError;

/// Fails with `Forbidden` unless the caller acts as admin.
pub(crate) fn require_admin(metadata: &CommandMetadata) -> Result<(), SessionError> {
    if metadata.is_admin() {
        Ok(())
    } else {
        Err(SessionError::forbidden())
    }
}

/// Fails with `Forbidden` when a non-admin caller acts for another user.
pub(crate) fn require_self_or_admin(
    metadata: &CommandMetadata,
    uid: &UserId,
) -> Result<(), SessionError> {
    if metadata.is_admin() || &metadata.user_id == uid {
        Ok(())
    } else {
        Err(SessionError::forbidden())
    }
}
