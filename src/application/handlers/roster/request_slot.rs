//! RequestSlotHandler - Command handler for a user asking to join a session.

use tracing::{debug, info, warn};

use crate::domain::foundation::{CommandMetadata, SessionId};
use crate::domain::roster::{Admission, AdmissionOutcome, Participant, RosterChange};
use crate::domain::session::{document, SessionError};
use crate::domain::user::UserRef;

use super::mutation::RosterMutator;
use super::names::DisplayNames;
use crate::application::handlers::records::store_error;
use crate::application::handlers::require_self_or_admin;

/// Command to add or re-activate a user's entry in a session.
#[derive(Debug, Clone)]
pub struct RequestSlotCommand {
    pub session_id: SessionId,
    pub user: UserRef,
    /// Capacity check evaluated inside the roster write.
    pub admission: Admission,
}

impl RequestSlotCommand {
    pub fn new(session_id: SessionId, user: UserRef) -> Self {
        Self {
            session_id,
            user,
            admission: Admission::Unchecked,
        }
    }

    pub fn with_admission(mut self, admission: Admission) -> Self {
        self.admission = admission;
        self
    }
}

/// Result of a slot request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestSlotResult {
    pub participant: Participant,
    pub change: RosterChange,
    pub admission: AdmissionOutcome,
    pub attempts: u32,
}

/// Handler for slot requests.
///
/// Users request for themselves; admins may request on anyone's behalf.
/// The entry ends up `pending` with a freshly resolved name. An existing
/// entry keeps its position and check-in flag.
pub struct RequestSlotHandler {
    mutator: RosterMutator,
    names: DisplayNames,
}

impl RequestSlotHandler {
    pub fn new(mutator: RosterMutator, names: DisplayNames) -> Self {
        Self { mutator, names }
    }

    pub async fn handle(
        &self,
        cmd: RequestSlotCommand,
        metadata: CommandMetadata,
    ) -> Result<RequestSlotResult, SessionError> {
        require_self_or_admin(&metadata, &cmd.user.uid)?;
        let name = self.names.resolve(&cmd.user).await?;

        if cmd.admission == Admission::Unchecked {
            if let Some(result) = self.try_first_join(&cmd, &name).await? {
                info!(
                    session_id = %cmd.session_id,
                    uid = %cmd.user.uid,
                    correlation_id = metadata.correlation_id_opt(),
                    "Slot requested"
                );
                return Ok(result);
            }
        }

        let uid = &cmd.user.uid;
        let mutated = self
            .mutator
            .apply(&cmd.session_id, |session, roster| {
                let admission = cmd
                    .admission
                    .evaluate(roster, uid, session.max_participants())
                    .map_err(SessionError::policy)?;
                let change = roster.request(uid.clone(), name.clone());
                let participant = roster.get(uid).cloned().ok_or_else(|| {
                    SessionError::participant_not_found(cmd.session_id.clone(), uid.clone())
                })?;
                Ok((participant, change, admission))
            })
            .await?;

        let (participant, change, admission) = mutated.value;
        if let AdmissionOutcome::Overbooked {
            occupancy,
            capacity,
        } = admission
        {
            warn!(
                session_id = %cmd.session_id,
                uid = %uid,
                occupancy,
                capacity,
                "Session overbooked under soft capacity policy"
            );
        }
        info!(
            session_id = %cmd.session_id,
            uid = %uid,
            ?change,
            attempts = mutated.attempts,
            correlation_id = metadata.correlation_id_opt(),
            "Slot requested"
        );

        Ok(RequestSlotResult {
            participant,
            change,
            admission,
            attempts: mutated.attempts,
        })
    }

    /// Appends a brand-new entry with the store's keyed array union.
    ///
    /// Returns `None` when the user already has an entry, so the caller falls
    /// back to the conditional write.
    async fn try_first_join(
        &self,
        cmd: &RequestSlotCommand,
        name: &str,
    ) -> Result<Option<RequestSlotResult>, SessionError> {
        let records = self.mutator.records();
        let session = records.load(&cmd.session_id).await?;
        if session.roster().contains(&cmd.user.uid) {
            return Ok(None);
        }

        let participant = Participant::pending(cmd.user.uid.clone(), name);
        let inserted = records
            .store()
            .array_union(
                records.collection(),
                cmd.session_id.as_str(),
                document::keys::PARTICIPANTS,
                document::encode_participant(&participant),
                document::keys::UID,
            )
            .await
            .map_err(|e| store_error(&cmd.session_id, e))?;

        if !inserted {
            debug!(
                session_id = %cmd.session_id,
                uid = %cmd.user.uid,
                "Entry appeared concurrently, falling back to conditional write"
            );
            return Ok(None);
        }

        Ok(Some(RequestSlotResult {
            participant,
            change: RosterChange::Added,
            admission: AdmissionOutcome::Admitted,
            attempts: 1,
        }))
    }
}
