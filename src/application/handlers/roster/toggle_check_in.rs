//! ToggleCheckInHandler - Admin command flipping a participant's presence.

use tracing::info;

use crate::domain::foundation::{CommandMetadata, SessionId, UserId};
use crate::domain::roster::Participant;
use crate::domain::session::SessionError;

use super::mutation::RosterMutator;
use crate::application::handlers::require_admin;

/// Command to flip one participant's check-in flag.
#[derive(Debug, Clone)]
pub struct ToggleCheckInCommand {
    pub session_id: SessionId,
    pub user_id: UserId,
}

/// Handler for check-in toggles. Status is left untouched.
pub struct ToggleCheckInHandler {
    mutator: RosterMutator,
}

impl ToggleCheckInHandler {
    pub fn new(mutator: RosterMutator) -> Self {
        Self { mutator }
    }

    pub async fn handle(
        &self,
        cmd: ToggleCheckInCommand,
        metadata: CommandMetadata,
    ) -> Result<Participant, SessionError> {
        require_admin(&metadata)?;

        let mutated = self
            .mutator
            .apply(&cmd.session_id, |_, roster| {
                roster.toggle_check_in(&cmd.user_id);
                roster.get(&cmd.user_id).cloned().ok_or_else(|| {
                    SessionError::participant_not_found(cmd.session_id.clone(), cmd.user_id.clone())
                })
            })
            .await?;

        info!(
            session_id = %cmd.session_id,
            uid = %cmd.user_id,
            checked_in = mutated.value.checked_in,
            correlation_id = metadata.correlation_id_opt(),
            "Check-in toggled"
        );
        Ok(mutated.value)
    }
}
