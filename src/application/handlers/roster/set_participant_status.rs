//! SetParticipantStatusHandler - Admin command moving a participant through
//! the approval workflow.

use tracing::info;

use crate::domain::foundation::{CommandMetadata, SessionId, UserId};
use crate::domain::roster::{Participant, ParticipantStatus};
use crate::domain::session::SessionError;

use super::mutation::RosterMutator;
use crate::application::handlers::require_admin;

/// Command to set one participant's status.
#[derive(Debug, Clone)]
pub struct SetParticipantStatusCommand {
    pub session_id: SessionId,
    pub user_id: UserId,
    pub status: ParticipantStatus,
}

/// Handler for status changes.
///
/// `completed` checks the participant in; every other status checks them
/// out. Both change in the same write.
pub struct SetParticipantStatusHandler {
    mutator: RosterMutator,
}

impl SetParticipantStatusHandler {
    pub fn new(mutator: RosterMutator) -> Self {
        Self { mutator }
    }

    pub async fn handle(
        &self,
        cmd: SetParticipantStatusCommand,
        metadata: CommandMetadata,
    ) -> Result<Participant, SessionError> {
        require_admin(&metadata)?;

        let mutated = self
            .mutator
            .apply(&cmd.session_id, |_, roster| {
                roster
                    .set_status(&cmd.user_id, cmd.status)
                    .cloned()
                    .ok_or_else(|| {
                        SessionError::participant_not_found(
                            cmd.session_id.clone(),
                            cmd.user_id.clone(),
                        )
                    })
            })
            .await?;

        info!(
            session_id = %cmd.session_id,
            uid = %cmd.user_id,
            status = %cmd.status,
            attempts = mutated.attempts,
            correlation_id = metadata.correlation_id_opt(),
            "Participant status set"
        );
        Ok(mutated.value)
    }
}
