//! AdminAssignHandler - Admin command seating a user directly as approved.

use tracing::info;

use crate::domain::foundation::{CommandMetadata, SessionId};
use crate::domain::roster::{Participant, RosterChange};
use crate::domain::session::SessionError;
use crate::domain::user::UserRef;

use super::mutation::RosterMutator;
use super::names::DisplayNames;
use crate::application::handlers::require_admin;

/// Command to seat a user in a session.
#[derive(Debug, Clone)]
pub struct AdminAssignCommand {
    pub session_id: SessionId,
    pub user: UserRef,
}

/// Result of an assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminAssignResult {
    pub participant: Participant,
    pub change: RosterChange,
}

/// Handler for admin assignments.
///
/// A new entry is appended as `approved` and checked out. An existing entry
/// is moved to the same state in place with a refreshed name.
pub struct AdminAssignHandler {
    mutator: RosterMutator,
    names: DisplayNames,
}

impl AdminAssignHandler {
    pub fn new(mutator: RosterMutator, names: DisplayNames) -> Self {
        Self { mutator, names }
    }

    pub async fn handle(
        &self,
        cmd: AdminAssignCommand,
        metadata: CommandMetadata,
    ) -> Result<AdminAssignResult, SessionError> {
        require_admin(&metadata)?;
        let name = self.names.resolve(&cmd.user).await?;
        let uid = &cmd.user.uid;

        let mutated = self
            .mutator
            .apply(&cmd.session_id, |_, roster| {
                let change = roster.assign(uid.clone(), name.clone());
                let participant = roster.get(uid).cloned().ok_or_else(|| {
                    SessionError::participant_not_found(cmd.session_id.clone(), uid.clone())
                })?;
                Ok(AdminAssignResult {
                    participant,
                    change,
                })
            })
            .await?;

        info!(
            session_id = %cmd.session_id,
            uid = %uid,
            change = ?mutated.value.change,
            correlation_id = metadata.correlation_id_opt(),
            "User assigned by admin"
        );
        Ok(mutated.value)
    }
}
